// ABOUTME: Runtime configuration for the admin client
// ABOUTME: Loaded from an optional TOML file with environment variable override

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const API_URL_ENV: &str = "SITE_ADMIN_API_URL";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub api_url: String,
    pub request_timeout_secs: u64,
    pub notice_ttl_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            request_timeout_secs: 30,
            notice_ttl_ms: 3000,
        }
    }
}

impl Config {
    /// Reads `path` when given, then applies `SITE_ADMIN_API_URL`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file {}", path.display()))?;
                Self::from_toml(&raw)
                    .with_context(|| format!("Invalid config file {}", path.display()))?
            }
            None => Self::default(),
        };

        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                config.api_url = url;
            }
        }
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("Failed to parse TOML")
    }

    pub fn with_api_url(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url {
            self.api_url = url;
        }
        self
    }

    /// Checks the API URL and normalises away a trailing slash.
    pub fn validate(mut self) -> Result<Self> {
        let url = self.api_url.trim().trim_end_matches('/').to_string();
        if url.is_empty() {
            bail!(
                "No API URL configured. Set api_url in the config file, {} or pass --api-url",
                API_URL_ENV
            );
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            bail!("API URL must start with http:// or https://, got '{}'", url);
        }
        self.api_url = url;
        Ok(self)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn notice_ttl(&self) -> Duration {
        Duration::from_millis(self.notice_ttl_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_fill_missing_keys() {
        let config = Config::from_toml("api_url = \"https://api.example.com\"").unwrap();
        assert_eq!(config.api_url, "https://api.example.com");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.notice_ttl(), Duration::from_millis(3000));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(Config::from_toml("api_uri = \"typo\"").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_url = \"http://localhost:5000/api/\"").unwrap();
        writeln!(file, "notice_ttl_ms = 1500").unwrap();

        let config = Config::load(Some(file.path()))
            .unwrap()
            .with_api_url(None)
            .validate();
        // the environment may override the URL, so only check what the file alone decides
        let config = config.unwrap();
        assert_eq!(config.notice_ttl_ms, 1500);
        assert!(!config.api_url.ends_with('/'));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = Config::load(Some(Path::new("/no/such/site-admin.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_validate_requires_url() {
        assert!(Config::default().validate().is_err());
        assert!(Config::default()
            .with_api_url(Some("ftp://example.com".to_string()))
            .validate()
            .is_err());
    }

    #[test]
    fn test_cli_flag_wins() {
        let config = Config::from_toml("api_url = \"https://a.example.com\"")
            .unwrap()
            .with_api_url(Some("https://b.example.com/".to_string()))
            .validate()
            .unwrap();
        assert_eq!(config.api_url, "https://b.example.com");
    }
}
