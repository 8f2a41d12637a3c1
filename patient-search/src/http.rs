use crate::{
    directory::RecordDirectory,
    error::{Result, SearchError},
    models::Patient,
};
use async_trait::async_trait;
use auth_identity::SessionStore;
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// REST patient directory: `GET {base_url}/patients/search?q=...`
///
/// The session's bearer token is attached when present. A 401 signs the
/// session out before the error is returned.
#[derive(Clone)]
pub struct HttpPatientDirectory {
    client: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl HttpPatientDirectory {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        session: Arc<SessionStore>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn search_url(&self) -> String {
        format!("{}/patients/search", self.base_url)
    }
}

#[async_trait]
impl RecordDirectory for HttpPatientDirectory {
    type Record = Patient;

    async fn search(&self, text: &str) -> Result<Vec<Patient>> {
        let url = self.search_url();
        debug!(url = %url, "Sending patient search request");

        let mut request = self.client.get(&url).query(&[("q", text)]);
        if let Some(token) = self.session.bearer_token() {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                SearchError::Network(format!("request timed out: {e}"))
            } else {
                SearchError::Network(e.to_string())
            }
        })?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::UNAUTHORIZED => {
                warn!("Patient search rejected the session token");
                self.session.handle_unauthorized();
                return Err(SearchError::Unauthenticated);
            }
            status => return Err(SearchError::Status(status.as_u16())),
        }

        response
            .json::<Vec<Patient>>()
            .await
            .map_err(|e| SearchError::Decode(e.to_string()))
    }
}
