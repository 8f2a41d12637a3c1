use crate::{error::AccessDenial, resolver::authorize};
use auth_identity::{Identity, Role};

/// Declarative gate in front of protected content.
///
/// Mirrors how views declare access: a set of roles allowed in, plus an
/// optional permission the identity must also hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleGuard {
    allowed_roles: Vec<Role>,
    required_permission: Option<String>,
}

impl RoleGuard {
    pub fn new(allowed_roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            allowed_roles: allowed_roles.into_iter().collect(),
            required_permission: None,
        }
    }

    /// Guard open to every role; only a permission (if any) restricts it
    pub fn any_role() -> Self {
        Self::new(Role::ALL)
    }

    pub fn require_permission(mut self, permission: impl Into<String>) -> Self {
        self.required_permission = Some(permission.into());
        self
    }

    pub fn allowed_roles(&self) -> &[Role] {
        &self.allowed_roles
    }

    pub fn required_permission(&self) -> Option<&str> {
        self.required_permission.as_deref()
    }

    pub fn evaluate(&self, identity: Option<&Identity>) -> Result<(), AccessDenial> {
        authorize(identity, &self.allowed_roles, self.required_permission())
    }

    /// Build the content only when access is granted.
    ///
    /// On denial the caller's `fallback` is used if given; otherwise the
    /// denial comes back so the caller can show its default notice.
    pub fn gate<T>(
        &self,
        identity: Option<&Identity>,
        content: impl FnOnce() -> T,
        fallback: Option<T>,
    ) -> Result<T, AccessDenial> {
        match self.evaluate(identity) {
            Ok(()) => Ok(content()),
            Err(denial) => fallback.ok_or(denial),
        }
    }

    /// Wrap a view constructor so every call goes through this guard
    pub fn wrap<A, T>(
        self,
        build: impl Fn(A) -> T,
    ) -> impl Fn(Option<&Identity>, A) -> Result<T, AccessDenial> {
        move |identity, args| self.evaluate(identity).map(|()| build(args))
    }
}
