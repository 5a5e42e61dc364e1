use anyhow::Result;
use config::{Config, Environment};
use serde::Deserialize;
use std::fmt;

pub const DEFAULT_ENDPOINT: &str = "https://api.hbdm.com";
pub const DEFAULT_LEVER: i32 = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Deserialize, Clone)]
pub struct HbdmConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    pub api_key: String,
    pub secret_key: String,
    /// 默认杠杆倍数，<=0 时在构造合约客户端时改为 10
    #[serde(default)]
    pub lever: i32,
    #[serde(default)]
    pub debug: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl fmt::Debug for HbdmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HbdmConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key)
            .field("secret_key", &"***")
            .field("lever", &self.lever)
            .field("debug", &self.debug)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl HbdmConfig {
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        HbdmConfig {
            endpoint: default_endpoint(),
            api_key: api_key.into(),
            secret_key: secret_key.into(),
            lever: DEFAULT_LEVER,
            debug: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_lever(mut self, lever: i32) -> Self {
        self.lever = lever;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// 从环境变量读取 (HBDM_API_KEY, HBDM_SECRET_KEY, HBDM_ENDPOINT, HBDM_LEVER ...)，
    /// 支持 .env 文件
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let settings = Config::builder()
            .add_source(Environment::with_prefix("HBDM").try_parsing(true))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// 杠杆 <=0 时取默认值 10
    pub fn effective_lever(&self) -> i32 {
        if self.lever <= 0 {
            DEFAULT_LEVER
        } else {
            self.lever
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lever_defaults_to_ten_when_not_positive() {
        let cfg = HbdmConfig::new("k", "s").with_lever(0);
        assert_eq!(cfg.effective_lever(), 10);
        let cfg = cfg.with_lever(-3);
        assert_eq!(cfg.effective_lever(), 10);
        let cfg = cfg.with_lever(20);
        assert_eq!(cfg.effective_lever(), 20);
    }

    #[test]
    fn debug_output_hides_secret() {
        let cfg = HbdmConfig::new("my-access-key", "my-secret-key");
        let out = format!("{:?}", cfg);
        assert!(out.contains("my-access-key"));
        assert!(!out.contains("my-secret-key"));
    }

    #[test]
    fn deserialize_fills_defaults() {
        let cfg: HbdmConfig =
            serde_json::from_str(r#"{"api_key":"k","secret_key":"s"}"#).unwrap();
        assert_eq!(cfg.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(cfg.lever, 0);
        assert_eq!(cfg.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(!cfg.debug);
    }
}
