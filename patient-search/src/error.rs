use auth_rbac::AccessDenial;
use error_common::EmrError;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Search service returned status {0}")]
    Status(u16),

    #[error("Session expired, please sign in again")]
    Unauthenticated,

    #[error("Search timed out after {} ms", .0.as_millis())]
    Timeout(Duration),

    #[error("Malformed search response: {0}")]
    Decode(String),

    #[error(transparent)]
    Denied(#[from] AccessDenial),

    #[error("Search view is closed")]
    ControllerClosed,
}

pub type Result<T> = std::result::Result<T, SearchError>;

impl SearchError {
    /// Short notice shown next to the search box when a lookup fails
    pub fn notice(&self) -> String {
        match self {
            Self::Unauthenticated => self.to_string(),
            Self::Denied(denial) => denial.to_string(),
            _ => "Failed to search patients. Please try again.".to_string(),
        }
    }
}

impl From<SearchError> for EmrError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::Network(msg) => EmrError::Transport(msg),
            SearchError::Status(code) => EmrError::Transport(format!("status {code}")),
            SearchError::Unauthenticated => EmrError::Unauthenticated,
            SearchError::Timeout(after) => {
                EmrError::Timeout(u64::try_from(after.as_millis()).unwrap_or(u64::MAX))
            }
            SearchError::Decode(msg) => EmrError::Transport(format!("bad response: {msg}")),
            SearchError::Denied(denial) => denial.into(),
            SearchError::ControllerClosed => {
                EmrError::Internal(anyhow::anyhow!("search controller already shut down"))
            }
        }
    }
}
