use auth_identity::IdentityError;
use auth_rbac::AccessDenial;
use config_engine::ConfigError;
use error_common::EmrError;
use logger_redacted::LoggerError;
use patient_search::SearchError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortalError {
    #[error(transparent)]
    Denied(#[from] AccessDenial),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Logging(#[from] LoggerError),

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Document service error: {0}")]
    DocumentService(String),
}

pub type Result<T> = std::result::Result<T, PortalError>;

impl From<PortalError> for EmrError {
    fn from(err: PortalError) -> Self {
        match err {
            PortalError::Denied(denial) => denial.into(),
            PortalError::Identity(err) => err.into(),
            PortalError::Search(err) => err.into(),
            PortalError::Config(err) => err.into(),
            PortalError::Logging(err) => EmrError::Config(err.to_string()),
            PortalError::DocumentNotFound(id) => EmrError::NotFound(format!("document {id}")),
            PortalError::DocumentService(msg) => EmrError::Transport(msg),
        }
    }
}
