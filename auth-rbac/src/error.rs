use error_common::EmrError;
use serde::Serialize;
use thiserror::Error;

/// Why gated content must not render.
///
/// The Display text is the default notice shown in place of the content.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum AccessDenial {
    #[error("Please log in to access this content.")]
    Unauthenticated,

    #[error("You don't have permission to access this content.{}", .missing.as_deref().map(|p| format!(" Missing permission: {p}")).unwrap_or_default())]
    InsufficientPermission { missing: Option<String> },
}

impl AccessDenial {
    /// Permission named in the denial, when known
    pub fn missing_permission(&self) -> Option<&str> {
        match self {
            Self::Unauthenticated => None,
            Self::InsufficientPermission { missing } => missing.as_deref(),
        }
    }
}

impl From<AccessDenial> for EmrError {
    fn from(denial: AccessDenial) -> Self {
        match denial {
            AccessDenial::Unauthenticated => EmrError::Unauthenticated,
            AccessDenial::InsufficientPermission { missing } => EmrError::Unauthorized { missing },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notices_distinguish_sign_in_from_permission() {
        assert_eq!(
            AccessDenial::Unauthenticated.to_string(),
            "Please log in to access this content."
        );
        assert_eq!(
            AccessDenial::InsufficientPermission {
                missing: Some("staff_write".to_string())
            }
            .to_string(),
            "You don't have permission to access this content. Missing permission: staff_write"
        );
        assert_eq!(
            AccessDenial::InsufficientPermission { missing: None }.to_string(),
            "You don't have permission to access this content."
        );
    }

    #[test]
    fn converts_into_workspace_taxonomy() {
        let err: EmrError = AccessDenial::InsufficientPermission {
            missing: Some("patient_search".to_string()),
        }
        .into();
        assert_eq!(err.code(), "AUTHZ_3002");
        assert!(matches!(EmrError::from(AccessDenial::Unauthenticated), EmrError::Unauthenticated));
    }
}
