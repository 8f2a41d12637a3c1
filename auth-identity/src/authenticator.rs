use crate::{
    directory::{demo_identity, role_for_email},
    error::{IdentityError, Result},
    models::{SignInRequest, SignInResponse},
};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

/// Exchanges credentials for an identity and an opaque bearer token
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn sign_in(&self, request: &SignInRequest) -> Result<SignInResponse>;
}

/// Local authenticator for demos and tests: any password is accepted and the
/// role is inferred from the email address.
#[derive(Debug, Default, Clone)]
pub struct DemoAuthenticator;

#[async_trait]
impl Authenticator for DemoAuthenticator {
    async fn sign_in(&self, request: &SignInRequest) -> Result<SignInResponse> {
        let role = role_for_email(&request.email);
        let mut user = demo_identity(role);
        user.email.clone_from(&request.email);
        user.phone.clone_from(&request.phone);

        Ok(SignInResponse {
            token: format!("mock-jwt-token-{}", Utc::now().timestamp_millis()),
            user,
        })
    }
}

/// REST authenticator: `POST {base_url}/auth/signin`
#[derive(Debug, Clone)]
pub struct HttpAuthenticator {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthenticator {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| IdentityError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn signin_url(&self) -> String {
        format!("{}/auth/signin", self.base_url)
    }
}

#[async_trait]
impl Authenticator for HttpAuthenticator {
    async fn sign_in(&self, request: &SignInRequest) -> Result<SignInResponse> {
        let url = self.signin_url();
        debug!(url = %url, "Sending sign-in request");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| IdentityError::Network(e.to_string()))?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(IdentityError::InvalidCredentials)
            }
            status => {
                return Err(IdentityError::Network(format!(
                    "Sign in failed with status: {status}"
                )))
            }
        }

        response
            .json::<SignInResponse>()
            .await
            .map_err(|e| IdentityError::Decode(e.to_string()))
    }
}
