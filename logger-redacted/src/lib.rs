//! Logging setup with automatic PII redaction
//!
//! Every crate in the workspace logs through `tracing`. This crate owns the
//! subscriber installation for binaries and the [`PiiRedactor`] used
//! wherever user-typed text (search queries, sign-in emails) would otherwise
//! land in a log line.
//!
//! # Detected Data Types
//!
//! - **Email Addresses**: user@example.com → u***@e***
//! - **Phone Numbers**: (555) 123-4567 → (***) ***-****
//! - **SSN**: 123-45-6789 → ***-**-****
//! - **UHIDs**: ELG2024001 → ELG*******
//!
//! With `hash_for_correlation` (the default) matches are replaced by a short
//! SHA-256 prefix instead, so repeated values can still be correlated.
//!
//! # Example
//!
//! ```rust
//! use logger_redacted::{PiiRedactor, RedactionConfig};
//!
//! let redactor = PiiRedactor::new(RedactionConfig {
//!     hash_for_correlation: false,
//!     ..Default::default()
//! });
//! assert_eq!(redactor.redact("uhid ELG2024001"), "uhid ELG*******");
//! ```

pub mod config;
pub mod macros;
pub mod redactor;

pub use config::*;
pub use redactor::*;

use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("Invalid log filter '{0}'")]
    InvalidFilter(String),

    #[error("A global tracing subscriber is already installed")]
    AlreadyInitialized,
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `config.level` when set. Calling this twice returns
/// [`LoggerError::AlreadyInitialized`] rather than panicking.
pub fn init_logging(config: &LoggerConfig) -> Result<(), LoggerError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|_| LoggerError::InvalidFilter(config.level.clone()))?,
    };

    let json_layer = config
        .json
        .then(|| fmt::layer().with_target(false).json());
    let pretty_layer = (!config.json).then(|| fmt::layer().with_target(true));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(pretty_layer)
        .try_init()
        .map_err(|_| LoggerError::AlreadyInitialized)
}
