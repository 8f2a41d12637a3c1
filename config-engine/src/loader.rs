use crate::{error::Result, portal::PortalConfig};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment prefix; `EMR_SEARCH__DEBOUNCE_MS=250` sets `search.debounce_ms`
pub const ENV_PREFIX: &str = "EMR_";

/// Builds a [`PortalConfig`] from layered sources.
///
/// Later layers win: built-in defaults, then the YAML file (if any), then
/// `EMR_*` environment variables.
#[derive(Debug, Default, Clone)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    load_dotenv: bool,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layer a YAML file over the defaults. A missing file is skipped.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Read a `.env` file into the process environment before loading
    pub fn with_dotenv(mut self) -> Self {
        self.load_dotenv = true;
        self
    }

    pub fn figment(&self) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(PortalConfig::default()));
        if let Some(ref path) = self.file {
            debug!(path = %path.display(), "Layering configuration file");
            figment = figment.merge(Yaml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load(&self) -> Result<PortalConfig> {
        if self.load_dotenv {
            match dotenvy::dotenv() {
                Ok(path) => debug!(path = %path.display(), "Loaded .env"),
                Err(e) if e.not_found() => {}
                Err(e) => tracing::warn!(error = %e, "Ignoring unreadable .env"),
            }
        }

        let config: PortalConfig = self.figment().extract()?;
        config.validate()?;
        info!(
            backend = %config.api.backend,
            base_url = %config.api.base_url,
            debounce_ms = config.search.debounce_ms,
            "Configuration loaded"
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::portal::Backend;
    use figment::Jail;

    #[test]
    fn defaults_without_sources() {
        Jail::expect_with(|_jail| {
            let config = ConfigLoader::new().load().map_err(|e| e.to_string())?;
            assert_eq!(config, PortalConfig::default());
            Ok(())
        });
    }

    #[test]
    fn file_then_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "portal.yaml",
                r"
api:
  base_url: https://emr.example.org/api
search:
  debounce_ms: 500
  show_results: false
",
            )?;
            jail.set_env("EMR_SEARCH__DEBOUNCE_MS", "250");
            jail.set_env("EMR_LOGGING__JSON", "true");
            jail.set_env("EMR_API__BACKEND", "http");

            let config = ConfigLoader::new()
                .with_file("portal.yaml")
                .load()
                .map_err(|e| e.to_string())?;

            assert_eq!(config.api.base_url, "https://emr.example.org/api");
            assert_eq!(config.api.backend, Backend::Http);
            assert_eq!(config.search.debounce_ms, 250);
            assert!(!config.search.show_results);
            assert_eq!(config.search.blur_grace_ms, 200);
            assert!(config.logging.json);
            Ok(())
        });
    }

    #[test]
    fn invalid_values_are_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("EMR_API__BASE_URL", "ftp://files");
            let result = ConfigLoader::new().load();
            assert!(matches!(result, Err(ConfigError::ValidationError(_))));
            Ok(())
        });
    }
}
