use error_common::EmrError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not signed in")]
    NotAuthenticated,

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Invalid payload: {0}")]
    Validation(String),

    #[error("Authentication service unreachable: {0}")]
    Network(String),

    #[error("Malformed authentication response: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, IdentityError>;

impl From<validator::ValidationErrors> for IdentityError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

impl From<IdentityError> for EmrError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::InvalidCredentials | IdentityError::NotAuthenticated => {
                EmrError::Unauthenticated
            }
            IdentityError::UnknownRole(_) | IdentityError::Validation(_) => {
                EmrError::Validation(err.to_string())
            }
            IdentityError::Network(msg) => EmrError::Transport(msg),
            IdentityError::Decode(msg) => EmrError::Transport(format!("bad response: {msg}")),
        }
    }
}
