use error_common::EmrError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration parsing failed: {0}")]
    ParseError(#[from] Box<figment::Error>),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::ParseError(Box::new(err))
    }
}

impl From<ConfigError> for EmrError {
    fn from(err: ConfigError) -> Self {
        EmrError::Config(err.to_string())
    }
}
