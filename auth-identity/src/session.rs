use crate::{
    authenticator::{Authenticator, DemoAuthenticator},
    directory::demo_identity,
    error::{IdentityError, Result},
    models::{Identity, Role, SignInRequest},
};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;
use validator::Validate;

/// Owner of the current session identity.
///
/// The identity is published through a `watch` channel: views subscribe and
/// rebuild when it changes, and the authorization resolver only ever sees
/// the `Identity` value handed to it. Nothing here is process-global; the
/// store is passed explicitly to whoever needs it.
pub struct SessionStore {
    authenticator: Arc<dyn Authenticator>,
    identity: watch::Sender<Option<Identity>>,
    token: watch::Sender<Option<Arc<SecretString>>>,
}

impl SessionStore {
    pub fn new(authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            authenticator,
            identity: watch::Sender::new(None),
            token: watch::Sender::new(None),
        }
    }

    /// Store backed by [`DemoAuthenticator`]
    pub fn demo() -> Self {
        Self::new(Arc::new(DemoAuthenticator))
    }

    /// Validate the credentials, authenticate, and replace the session.
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
        phone: Option<&str>,
    ) -> Result<Identity> {
        let request = SignInRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
            phone: phone.map(str::to_string).filter(|p| !p.trim().is_empty()),
        };
        request.validate()?;

        let response = self.authenticator.sign_in(&request).await?;
        response.user.validate()?;

        let identity = response.user;
        info!(user_id = %identity.id, role = %identity.role, "Signed in");

        self.token
            .send_replace(Some(Arc::new(SecretString::new(response.token))));
        self.identity.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    /// Drop identity and token
    pub fn sign_out(&self) {
        if let Some(previous) = self.identity.send_replace(None) {
            info!(user_id = %previous.id, "Signed out");
        }
        self.token.send_replace(None);
    }

    /// Replace the identity wholesale with the demo identity for `role`.
    ///
    /// The bearer token is left as is.
    pub fn switch_role(&self, role: Role) -> Identity {
        let identity = demo_identity(role);
        info!(role = %role, "Switched demo role");
        self.identity.send_replace(Some(identity.clone()));
        identity
    }

    /// Called when a collaborator reports the token was rejected
    pub fn handle_unauthorized(&self) {
        tracing::warn!("Backend rejected the session token; signing out");
        self.sign_out();
    }

    pub fn current(&self) -> Option<Identity> {
        self.identity.borrow().clone()
    }

    pub fn require_identity(&self) -> Result<Identity> {
        self.current().ok_or(IdentityError::NotAuthenticated)
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.borrow().is_some()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.identity.subscribe()
    }

    pub fn bearer_token(&self) -> Option<Arc<SecretString>> {
        self.token.borrow().clone()
    }

    /// `Authorization` header value for the current token
    pub fn authorization_header(&self) -> Option<String> {
        self.token
            .borrow()
            .as_ref()
            .map(|token| format!("Bearer {}", token.expose_secret()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sign_in_publishes_identity_and_token() {
        let store = SessionStore::demo();
        let mut updates = store.subscribe();
        assert!(!store.is_authenticated());

        let identity = store
            .sign_in("admin@hospital.com", "password", None)
            .await
            .unwrap();
        assert_eq!(identity.role, Role::Admin);

        updates.changed().await.unwrap();
        assert_eq!(updates.borrow().as_ref().map(|i| i.role), Some(Role::Admin));
        assert!(store
            .authorization_header()
            .unwrap()
            .starts_with("Bearer mock-jwt-token-"));
    }

    #[tokio::test]
    async fn invalid_payload_never_reaches_authenticator() {
        let store = SessionStore::demo();
        let err = store.sign_in("nobody", "", None).await.unwrap_err();
        assert!(matches!(err, IdentityError::Validation(_)));
        assert!(store.current().is_none());
    }

    #[tokio::test]
    async fn sign_out_clears_identity_and_token() {
        let store = SessionStore::demo();
        store
            .sign_in("nurse.wilson@hospital.com", "password", Some("+1-555-2002"))
            .await
            .unwrap();
        store.sign_out();
        assert!(store.current().is_none());
        assert!(store.bearer_token().is_none());
        assert!(matches!(
            store.require_identity(),
            Err(IdentityError::NotAuthenticated)
        ));
    }

    #[test]
    fn switch_role_replaces_identity_wholesale() {
        let store = SessionStore::demo();
        store.switch_role(Role::Doctor);
        let identity = store.switch_role(Role::Receptionist);
        assert_eq!(store.current(), Some(identity.clone()));
        assert_eq!(identity.department.as_deref(), Some("Front Desk"));
        assert!(identity.permissions().iter().any(|p| p == "patient_search"));
    }

    #[tokio::test]
    async fn unauthorized_response_signs_out() {
        let store = SessionStore::demo();
        store.sign_in("hr@hospital.com", "password", None).await.unwrap();
        store.handle_unauthorized();
        assert!(!store.is_authenticated());
    }
}
