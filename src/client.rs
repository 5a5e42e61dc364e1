use anyhow::Result;
use reqwest::Url;
use std::time::Duration;

use crate::config::HbdmConfig;
use crate::error::HbdmError;

/// 带签名的 HTTP 客户端，逐仓/全仓合约共用
#[derive(Debug, Clone)]
pub struct HbdmClient {
    pub config: HbdmConfig,
    pub(crate) host: String,
    pub(crate) http: reqwest::Client,
}

impl HbdmClient {
    pub fn new(config: HbdmConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(HbdmError::Config("api_key must be set".into()).into());
        }
        if config.secret_key.trim().is_empty() {
            return Err(HbdmError::Config("secret_key must be set".into()).into());
        }
        let url = Url::parse(config.endpoint.trim_end_matches('/'))
            .map_err(|e| HbdmError::Config(format!("endpoint {}: {}", config.endpoint, e)))?;
        let host = url
            .host_str()
            .ok_or_else(|| HbdmError::Config(format!("endpoint {} has no host", config.endpoint)))?
            .to_lowercase();

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;

        Ok(HbdmClient { config, host, http })
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_is_taken_from_endpoint() {
        let cfg = HbdmConfig::new("k", "s").with_endpoint("https://API.hbdm.vn/");
        let client = HbdmClient::new(cfg).unwrap();
        assert_eq!(client.host(), "api.hbdm.vn");
    }

    #[test]
    fn client_debug_hides_secret() {
        let client = HbdmClient::new(HbdmConfig::new("k", "super-secret")).unwrap();
        assert!(!format!("{:?}", client).contains("super-secret"));
    }

    #[test]
    fn empty_credentials_are_rejected() {
        let err = HbdmClient::new(HbdmConfig::new("", "s")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<HbdmError>(),
            Some(HbdmError::Config(_))
        ));
    }
}
