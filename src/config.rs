use std::env;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::gemini::GEMINI_API_ROOT;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const APP_DIR_NAME: &str = "mini-studio";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing GEMINI_API_KEY (or API_KEY)")]
    MissingApiKey,
    #[error("invalid GEMINI_BASE_URL {value}: {reason}")]
    InvalidBaseUrl { value: String, reason: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
    pub data_dir: PathBuf,
    pub port: u16,
    pub secret_key: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from a key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_key = get("GEMINI_API_KEY")
            .or_else(|| get("API_KEY"))
            .ok_or(ConfigError::MissingApiKey)?;
        let base_url = match get("GEMINI_BASE_URL") {
            Some(raw) => validate_base_url(&raw)?,
            None => GEMINI_API_ROOT.to_string(),
        };
        let timeout = get("GENERATION_TIMEOUT_SECS")
            .and_then(|value| value.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let port = get("MCP_PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let data_dir = get("DATA_DIR").map(PathBuf::from).unwrap_or_else(|| {
            let mut base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
            base.push(APP_DIR_NAME);
            base
        });

        Ok(Self {
            api_key,
            base_url,
            timeout: Duration::from_secs(timeout),
            data_dir,
            port,
            secret_key: get("SECRET_KEY"),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    pub fn mcp_path(&self) -> String {
        self.prefixed("/mcp")
    }

    pub fn images_path(&self) -> String {
        self.prefixed("/images/{id}")
    }

    fn prefixed(&self, path: &str) -> String {
        match self.secret_key.as_deref() {
            Some(secret) => format!("/{secret}{path}"),
            None => path.to_string(),
        }
    }
}

fn validate_base_url(raw: &str) -> Result<String, ConfigError> {
    let parsed = Url::parse(raw).map_err(|err| ConfigError::InvalidBaseUrl {
        value: raw.to_string(),
        reason: err.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(raw.trim_end_matches('/').to_string()),
        scheme => Err(ConfigError::InvalidBaseUrl {
            value: raw.to_string(),
            reason: format!("unsupported scheme {scheme}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn api_key_is_required() {
        assert!(matches!(config(&[]), Err(ConfigError::MissingApiKey)));
        assert!(matches!(config(&[("GEMINI_API_KEY", "  ")]), Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn falls_back_to_legacy_api_key_and_defaults() {
        let cfg = config(&[("API_KEY", "legacy"), ("DATA_DIR", "/tmp/studio")]).unwrap();
        assert_eq!(cfg.api_key, "legacy");
        assert_eq!(cfg.base_url, GEMINI_API_ROOT);
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.timeout, Duration::from_secs(120));
        assert_eq!(cfg.data_dir, PathBuf::from("/tmp/studio"));
        assert_eq!(cfg.mcp_path(), "/mcp");
    }

    #[test]
    fn malformed_numbers_use_defaults() {
        let cfg = config(&[
            ("GEMINI_API_KEY", "k"),
            ("MCP_PORT", "not-a-port"),
            ("GENERATION_TIMEOUT_SECS", "0"),
        ])
        .unwrap();
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.timeout, Duration::from_secs(120));
    }

    #[test]
    fn secret_key_prefixes_routes() {
        let cfg = config(&[("GEMINI_API_KEY", "k"), ("SECRET_KEY", "s3cr3t")]).unwrap();
        assert_eq!(cfg.mcp_path(), "/s3cr3t/mcp");
        assert_eq!(cfg.images_path(), "/s3cr3t/images/{id}");
    }

    #[test]
    fn base_url_must_be_http() {
        let cfg = config(&[("GEMINI_API_KEY", "k"), ("GEMINI_BASE_URL", "http://localhost:8080/")]).unwrap();
        assert_eq!(cfg.base_url, "http://localhost:8080");
        assert!(matches!(
            config(&[("GEMINI_API_KEY", "k"), ("GEMINI_BASE_URL", "ftp://x")]),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            config(&[("GEMINI_API_KEY", "k"), ("GEMINI_BASE_URL", "nope")]),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }
}
