use crate::error::{ConfigError, Result};
use logger_redacted::LoggerConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Which collaborators the portal talks to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// In-process demo data, no network
    #[default]
    Demo,
    /// The REST API at `api.base_url`
    Http,
}

impl Backend {
    pub fn as_str(self) -> &'static str {
        match self {
            Backend::Demo => "demo",
            Backend::Http => "http",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "demo" => Ok(Backend::Demo),
            "http" => Ok(Backend::Http),
            other => Err(ConfigError::ValidationError(format!(
                "unknown backend '{other}', expected 'demo' or 'http'"
            ))),
        }
    }
}

/// Backend API settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub backend: Backend,
    pub base_url: String,
    pub request_timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Demo,
            base_url: "http://localhost:3000/api".to_string(),
            request_timeout_ms: 10_000,
        }
    }
}

/// Search-as-you-type settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Input quiet period before a lookup is issued
    pub debounce_ms: u64,
    /// Delay between losing focus and closing the dropdown, so a click on a
    /// result still lands
    pub blur_grace_ms: u64,
    pub show_results: bool,
    /// Simulated latency of the in-memory directory
    pub mock_latency_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            blur_grace_ms: 200,
            show_results: true,
            mock_latency_ms: 400,
        }
    }
}

/// Top-level portal configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub api: ApiConfig,
    pub search: SearchConfig,
    pub logging: LoggerConfig,
}

impl PortalConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.api.base_url.starts_with("http://") || self.api.base_url.starts_with("https://"))
        {
            return Err(ConfigError::ValidationError(format!(
                "api.base_url must be an http(s) URL, got '{}'",
                self.api.base_url
            )));
        }
        if self.api.request_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "api.request_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.search.debounce_ms == 0 {
            return Err(ConfigError::ValidationError(
                "search.debounce_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.api.request_timeout_ms)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.search.debounce_ms)
    }

    pub fn blur_grace(&self) -> Duration {
        Duration::from_millis(self.search.blur_grace_ms)
    }

    pub fn mock_latency(&self) -> Duration {
        Duration::from_millis(self.search.mock_latency_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PortalConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert_eq!(config.blur_grace(), Duration::from_millis(200));
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert!(config.search.show_results);
        assert_eq!(config.api.backend, Backend::Demo);
    }

    #[test]
    fn test_backend_parsing() {
        assert_eq!("HTTP".parse::<Backend>().unwrap(), Backend::Http);
        assert_eq!(" demo ".parse::<Backend>().unwrap(), Backend::Demo);
        assert!("grpc".parse::<Backend>().is_err());
        assert_eq!(Backend::Http.to_string(), "http");
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = PortalConfig::default();
        config.api.base_url = "localhost:3000".to_string();
        assert!(config.validate().is_err());

        let mut config = PortalConfig::default();
        config.search.debounce_ms = 0;
        assert!(config.validate().is_err());

        let mut config = PortalConfig::default();
        config.api.request_timeout_ms = 0;
        assert!(config.validate().is_err());
    }
}
