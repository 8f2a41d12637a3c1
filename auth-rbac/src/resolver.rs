use crate::{
    error::AccessDenial,
    permissions::{ALL, PATIENT_SEARCH, PATIENT_SEARCH_ANY},
};
use auth_identity::{Identity, Role};
use tracing::debug;

/// True iff an identity is present and it holds `permission` or `"all"`.
pub fn has_permission(identity: Option<&Identity>, permission: &str) -> bool {
    identity.is_some_and(|identity| {
        identity
            .permissions()
            .iter()
            .any(|granted| granted == ALL || granted == permission)
    })
}

/// True iff an identity is present and its role is exactly `role`.
pub fn has_role(identity: Option<&Identity>, role: Role) -> bool {
    identity.is_some_and(|identity| identity.role == role)
}

/// True iff an identity is present and its role is one of `roles`.
pub fn has_any_role(identity: Option<&Identity>, roles: &[Role]) -> bool {
    identity.is_some_and(|identity| roles.contains(&identity.role))
}

/// Composite gate for protected content.
///
/// Same answer as [`authorize`], without the reason.
pub fn can_render(
    identity: Option<&Identity>,
    allowed_roles: &[Role],
    required_permission: Option<&str>,
) -> bool {
    authorize(identity, allowed_roles, required_permission).is_ok()
}

/// Decide whether protected content may render, and if not, why.
///
/// A missing identity is reported as [`AccessDenial::Unauthenticated`]
/// before roles are considered. A role mismatch with no required permission
/// yields `InsufficientPermission { missing: None }`.
pub fn authorize(
    identity: Option<&Identity>,
    allowed_roles: &[Role],
    required_permission: Option<&str>,
) -> Result<(), AccessDenial> {
    let Some(subject) = identity else {
        return Err(AccessDenial::Unauthenticated);
    };

    let role_ok = allowed_roles.contains(&subject.role);
    let permission_ok = required_permission.map_or(true, |p| has_permission(identity, p));

    if role_ok && permission_ok {
        Ok(())
    } else {
        debug!(
            user_id = %subject.id,
            role = %subject.role,
            required = required_permission.unwrap_or("-"),
            role_ok,
            permission_ok,
            "Access denied"
        );
        Err(AccessDenial::InsufficientPermission {
            missing: required_permission.map(str::to_string),
        })
    }
}

/// Patient search is open to holders of `patient_search`, `patient_read` or `all`.
pub fn can_search_patients(identity: Option<&Identity>) -> Result<(), AccessDenial> {
    if identity.is_none() {
        return Err(AccessDenial::Unauthenticated);
    }
    if PATIENT_SEARCH_ANY
        .iter()
        .any(|permission| has_permission(identity, permission))
    {
        Ok(())
    } else {
        Err(AccessDenial::InsufficientPermission {
            missing: Some(PATIENT_SEARCH.to_string()),
        })
    }
}

/// Read-only capability view over the current identity.
///
/// Built per render from whatever identity the caller was handed; it holds
/// no state of its own.
#[derive(Debug, Clone, Copy)]
pub struct Permissions<'a> {
    identity: Option<&'a Identity>,
}

impl<'a> Permissions<'a> {
    pub fn for_identity(identity: Option<&'a Identity>) -> Self {
        Self { identity }
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        has_permission(self.identity, permission)
    }

    pub fn has_role(&self, role: Role) -> bool {
        has_role(self.identity, role)
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        has_any_role(self.identity, roles)
    }

    pub fn role(&self) -> Option<Role> {
        self.identity.map(|identity| identity.role)
    }

    /// Granted permission strings; empty when signed out
    pub fn granted(&self) -> &'a [String] {
        self.identity.map(Identity::permissions).unwrap_or_default()
    }
}
