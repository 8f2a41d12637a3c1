use crate::codes;
use serde::Serialize;
use thiserror::Error;

/// Workspace-wide error taxonomy.
///
/// Crate-level errors (`IdentityError`, `SearchError`, `ConfigError`, ...)
/// convert into this enum at the composition root so callers can branch on
/// the category without knowing which collaborator failed.
#[derive(Error, Debug)]
pub enum EmrError {
    /// No identity is present for the session
    #[error("Not authenticated")]
    Unauthenticated,

    /// Identity is present but lacks a role or permission
    #[error("Insufficient permission{}", .missing.as_deref().map(|p| format!(": {p}")).unwrap_or_default())]
    Unauthorized { missing: Option<String> },

    /// Transport-level failure talking to a backend collaborator
    #[error("Network error: {0}")]
    Transport(String),

    /// Backend collaborator did not answer in time
    #[error("Request timed out after {0} ms")]
    Timeout(u64),

    /// Payload or input validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Requested record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Wrapped internal errors
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl EmrError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => codes::authentication::SESSION_INVALID,
            Self::Unauthorized { .. } => codes::authorization::INSUFFICIENT_PERMISSIONS,
            Self::Transport(_) => codes::network::TRANSPORT_FAILED,
            Self::Timeout(_) => codes::network::TIMEOUT,
            Self::Validation(_) => codes::validation::INVALID_INPUT,
            Self::NotFound(_) => codes::resource::NOT_FOUND,
            Self::Config(_) => codes::system::CONFIGURATION,
            Self::Internal(_) => codes::system::INTERNAL,
        }
    }

    /// Whether the error is meant to be shown to the user as a notice.
    ///
    /// Configuration and internal faults are logged but surfaced as a
    /// generic message instead.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, Self::Config(_) | Self::Internal(_))
    }

    /// Serializable summary for the presentation layer.
    pub fn report(&self) -> ErrorReport {
        let message = if self.is_user_visible() {
            self.to_string()
        } else {
            "Something went wrong. Please try again.".to_string()
        };
        ErrorReport {
            code: self.code(),
            message,
        }
    }
}

/// Error summary handed to the presentation collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub code: &'static str,
    pub message: String,
}

/// Result type alias for portal operations
pub type Result<T> = std::result::Result<T, EmrError>;

/// Emit one structured error event
pub fn log_error(context: &str, error: &EmrError) {
    tracing::error!(
        context = context,
        error_code = error.code(),
        error = %error,
        "EMR error occurred"
    );
}
