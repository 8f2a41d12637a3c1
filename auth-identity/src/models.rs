use crate::error::IdentityError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Coarse-grained role of the signed-in user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Doctor,
    Patient,
    Admin,
    Hr,
    Nurse,
    Receptionist,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Doctor,
        Role::Patient,
        Role::Admin,
        Role::Hr,
        Role::Nurse,
        Role::Receptionist,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Doctor => "doctor",
            Role::Patient => "patient",
            Role::Admin => "admin",
            Role::Hr => "hr",
            Role::Nurse => "nurse",
            Role::Receptionist => "receptionist",
        }
    }

    /// Every role except `Patient`
    pub fn is_staff(self) -> bool {
        !matches!(self, Role::Patient)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| IdentityError::UnknownRole(s.to_string()))
    }
}

/// The authenticated subject of the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Free-form capability strings; `"all"` grants everything
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

impl Identity {
    /// Granted permission strings, empty when none were assigned
    pub fn permissions(&self) -> &[String] {
        self.permissions.as_deref().unwrap_or(&[])
    }

    /// "Dr. Sarah Johnson" → "DSJ", used for avatar fallbacks
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .collect()
    }
}

/// Sign-in payload, validated before it leaves the client
#[derive(Clone, Serialize, Validate)]
pub struct SignInRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 7, max = 20, message = "Phone number looks incomplete"))]
    pub phone: Option<String>,
}

impl fmt::Debug for SignInRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignInRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("phone", &self.phone)
            .finish()
    }
}

/// Backend answer to a successful sign-in
#[derive(Debug, Clone, Deserialize)]
pub struct SignInResponse {
    pub token: String,
    pub user: Identity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_strings() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
        }
        assert_eq!(" HR ".parse::<Role>().unwrap(), Role::Hr);
        assert!(matches!(
            "surgeon".parse::<Role>(),
            Err(IdentityError::UnknownRole(_))
        ));
    }

    #[test]
    fn identity_accepts_backend_shape() {
        let identity: Identity = serde_json::from_str(
            r#"{
                "id": "3",
                "name": "Admin User",
                "email": "admin@hospital.com",
                "role": "admin",
                "permissions": ["all"],
                "department": "Administration"
            }"#,
        )
        .unwrap();
        assert_eq!(identity.role, Role::Admin);
        assert_eq!(identity.permissions(), ["all".to_string()]);
        assert!(identity.validate().is_ok());
        assert_eq!(identity.initials(), "AU");
    }

    #[test]
    fn missing_permissions_read_as_empty() {
        let identity: Identity = serde_json::from_str(
            r#"{ "id": "9", "name": "Walk In", "email": "walk.in@email.com", "role": "patient" }"#,
        )
        .unwrap();
        assert!(identity.permissions.is_none());
        assert!(identity.permissions().is_empty());
    }

    #[test]
    fn sign_in_request_debug_hides_password() {
        let request = SignInRequest {
            email: "dr.johnson@hospital.com".to_string(),
            password: "hunter2".to_string(),
            phone: None,
        };
        let debug = format!("{request:?}");
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn sign_in_request_validation() {
        let bad = SignInRequest {
            email: "not-an-email".to_string(),
            password: String::new(),
            phone: Some("12".to_string()),
        };
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("phone"));
    }
}
