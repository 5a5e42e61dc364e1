use anyhow::Result;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;
use std::collections::BTreeMap;
use tracing::debug;

use super::models::RestApi;
use crate::client::HbdmClient;
use crate::error::HbdmError;
use crate::traits::Transport;

type HmacSha256 = Hmac<Sha256>;

impl HbdmClient {
    /// 请求参数以 JSON 作为 body，签名参数放在 query 上
    pub async fn post(&self, request_path: &str, params: &BTreeMap<String, String>) -> Result<Value> {
        let timestamp = Self::get_timestamp();
        let query = self.signed_query(request_path, &timestamp)?;
        let url = format!(
            "{}{}?{}",
            self.config.endpoint.trim_end_matches('/'),
            request_path,
            query
        );
        let body = serde_json::to_string(params)?;

        if self.config.debug {
            debug!(%url, %body, "[POST] request");
        }

        let resp = self
            .http
            .post(&url)
            .header("Content-Type", "application/json")
            .header("Accept-Language", "zh-cn")
            .body(body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if self.config.debug {
            debug!(%status, response = %text, "[POST] response");
        }

        Self::parse_response(status.as_u16(), &text)
    }

    /// 非 2xx 直接报错，否则解包 status/data
    pub fn parse_response(status: u16, text: &str) -> Result<Value> {
        if !(200..300).contains(&status) {
            return Err(HbdmError::Http {
                status,
                body: text.to_string(),
            }
            .into());
        }

        let ret: RestApi<Value> = serde_json::from_str(text)?;
        Ok(ret.into_data()?)
    }

    /// 构建带签名的 query 串，Signature 放最后
    pub fn signed_query(&self, request_path: &str, timestamp: &str) -> Result<String> {
        let mut auth: BTreeMap<&str, &str> = BTreeMap::new();
        auth.insert("AccessKeyId", &self.config.api_key);
        auth.insert("SignatureMethod", "HmacSHA256");
        auth.insert("SignatureVersion", "2");
        auth.insert("Timestamp", timestamp);

        let query = Self::build_query_string(&auth);
        let payload = format!("POST\n{}\n{}\n{}", self.host, request_path, query);
        let signature = Self::sign(&self.config.secret_key, &payload)?;

        Ok(format!(
            "{}&Signature={}",
            query,
            urlencoding::encode(&signature)
        ))
    }

    /// HmacSHA256 后 base64
    pub fn sign(secret_key: &str, payload: &str) -> Result<String> {
        let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes())
            .map_err(|e| HbdmError::Config(format!("invalid secret key: {}", e)))?;
        mac.update(payload.as_bytes());
        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }

    /// key 按 ASCII 排序，value 做 url 编码
    fn build_query_string(params: &BTreeMap<&str, &str>) -> String {
        params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// UTC 时间 2006-01-02T15:04:05
    pub fn get_timestamp() -> String {
        chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S").to_string()
    }
}

#[async_trait]
impl Transport for HbdmClient {
    async fn do_request(&self, path: &str, params: &BTreeMap<String, String>) -> Result<Value> {
        self.post(path, params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HbdmConfig;

    fn client() -> HbdmClient {
        HbdmClient::new(HbdmConfig::new("access-key", "secret-key")).unwrap()
    }

    #[test]
    fn query_is_sorted_and_encoded() {
        let query = client()
            .signed_query("/linear-swap-api/v1/swap_order", "2024-01-02T03:04:05")
            .unwrap();
        let (head, sig) = query.split_once("&Signature=").unwrap();
        assert_eq!(
            head,
            "AccessKeyId=access-key&SignatureMethod=HmacSHA256&SignatureVersion=2&Timestamp=2024-01-02T03%3A04%3A05"
        );
        assert!(!sig.is_empty());
        assert!(!sig.contains('+') && !sig.contains('/') && !sig.contains('='));
    }

    #[test]
    fn signature_depends_on_path_and_secret() {
        let c = client();
        let a = c.signed_query("/linear-swap-api/v1/swap_order", "2024-01-02T03:04:05").unwrap();
        let b = c.signed_query("/linear-swap-api/v1/swap_cancel", "2024-01-02T03:04:05").unwrap();
        assert_ne!(a, b);
        assert_eq!(
            a,
            c.signed_query("/linear-swap-api/v1/swap_order", "2024-01-02T03:04:05").unwrap()
        );

        let s1 = HbdmClient::sign("k1", "payload").unwrap();
        let s2 = HbdmClient::sign("k2", "payload").unwrap();
        assert_ne!(s1, s2);
        // 32 字节摘要的 base64 长度
        assert_eq!(s1.len(), 44);
    }

    #[test]
    fn signed_query_known_answer() {
        let query = client()
            .signed_query("/linear-swap-api/v1/swap_order", "2024-01-02T03:04:05")
            .unwrap();
        assert_eq!(
            query,
            "AccessKeyId=access-key&SignatureMethod=HmacSHA256&SignatureVersion=2\
             &Timestamp=2024-01-02T03%3A04%3A05\
             &Signature=qHbRZcGPAVTrZZ1zF4BYiw02wLGiMdQUWQ9VEUXYPm0%3D"
        );
    }

    #[test]
    fn non_success_status_is_http_error() {
        let err = HbdmClient::parse_response(502, "bad gateway").unwrap_err();
        assert_eq!(
            err.downcast_ref::<HbdmError>(),
            Some(&HbdmError::Http {
                status: 502,
                body: "bad gateway".into()
            })
        );
    }

    #[test]
    fn ok_envelope_yields_data() {
        let data = HbdmClient::parse_response(
            200,
            r#"{"status":"ok","data":[{"order_id":1}],"ts":1}"#,
        )
        .unwrap();
        assert_eq!(data, serde_json::json!([{"order_id": 1}]));
    }

    #[test]
    fn error_envelope_is_api_error() {
        let err = HbdmClient::parse_response(
            200,
            r#"{"status":"error","err_code":1032,"err_msg":"The number of access exceeded the limit.","ts":1}"#,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "1032:[The number of access exceeded the limit.]");
    }

    #[test]
    fn malformed_body_fails_to_decode() {
        let err = HbdmClient::parse_response(200, "<html>").unwrap_err();
        assert!(err.downcast_ref::<serde_json::Error>().is_some());
    }

    #[test]
    fn timestamp_format() {
        let ts = HbdmClient::get_timestamp();
        assert_eq!(ts.len(), 19);
        assert_eq!(&ts[10..11], "T");
    }
}
