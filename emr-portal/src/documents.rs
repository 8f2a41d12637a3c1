use crate::error::{PortalError, Result};
use async_trait::async_trait;
use auth_identity::{IdentityError, SessionStore};
use chrono::{DateTime, TimeZone, Utc};
use reqwest::{RequestBuilder, Response, StatusCode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

/// Row in the "my documents" list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentListItem {
    #[serde(rename = "_id")]
    pub id: String,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Authoritative document store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentService: Send + Sync {
    async fn list(&self) -> Result<Vec<DocumentListItem>>;
    async fn delete(&self, id: &str) -> Result<()>;
}

/// Local document list with optimistic deletion.
///
/// A delete removes the row immediately and keeps the previous list. If the
/// service rejects the delete the previous list is put back; otherwise the
/// list is reloaded from the service.
pub struct DocumentLibrary {
    service: Arc<dyn DocumentService>,
    documents: watch::Sender<Vec<DocumentListItem>>,
}

impl DocumentLibrary {
    pub fn new(service: Arc<dyn DocumentService>) -> Self {
        Self {
            service,
            documents: watch::Sender::new(Vec::new()),
        }
    }

    pub fn documents(&self) -> Vec<DocumentListItem> {
        self.documents.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<DocumentListItem>> {
        self.documents.subscribe()
    }

    pub async fn refresh(&self) -> Result<Vec<DocumentListItem>> {
        let documents = self.service.list().await?;
        self.documents.send_replace(documents.clone());
        Ok(documents)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let previous = self.documents();
        self.documents
            .send_modify(|documents| documents.retain(|doc| doc.id != id));

        if let Err(err) = self.service.delete(id).await {
            warn!(document_id = %id, error = %err, "Delete failed; restoring list");
            self.documents.send_replace(previous);
            return Err(err);
        }

        info!(document_id = %id, "Document deleted");
        match self.service.list().await {
            Ok(documents) => {
                self.documents.send_replace(documents);
            }
            Err(err) => warn!(error = %err, "Could not reload documents after delete"),
        }
        Ok(())
    }
}

/// Document service backed by a local list, for the demo portal
#[derive(Default)]
pub struct InMemoryDocumentService {
    documents: Mutex<Vec<DocumentListItem>>,
}

impl InMemoryDocumentService {
    pub fn new(documents: Vec<DocumentListItem>) -> Self {
        Self {
            documents: Mutex::new(documents),
        }
    }

    pub fn seeded() -> Self {
        let uploaded = |day: u32| {
            Utc.with_ymd_and_hms(2024, 1, day, 9, 30, 0)
                .single()
                .unwrap_or_default()
        };
        Self::new(vec![
            DocumentListItem {
                id: "doc-1".to_string(),
                filename: "blood-panel-2024-01.pdf".to_string(),
                uploaded_at: uploaded(12),
            },
            DocumentListItem {
                id: "doc-2".to_string(),
                filename: "chest-xray-report.pdf".to_string(),
                uploaded_at: uploaded(15),
            },
            DocumentListItem {
                id: "doc-3".to_string(),
                filename: "discharge-summary.pdf".to_string(),
                uploaded_at: uploaded(20),
            },
        ])
    }
}

#[async_trait]
impl DocumentService for InMemoryDocumentService {
    async fn list(&self) -> Result<Vec<DocumentListItem>> {
        Ok(self.documents.lock().await.clone())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut documents = self.documents.lock().await;
        let before = documents.len();
        documents.retain(|doc| doc.id != id);
        if documents.len() == before {
            return Err(PortalError::DocumentNotFound(id.to_string()));
        }
        Ok(())
    }
}

/// REST document service: `GET {base_url}/my-documents` and
/// `DELETE {base_url}/documents/{id}`.
///
/// Requests carry the session's bearer token. A 401 signs the session out.
#[derive(Clone)]
pub struct HttpDocumentService {
    client: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl HttpDocumentService {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        session: Arc<SessionStore>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PortalError::DocumentService(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn list_url(&self) -> String {
        format!("{}/my-documents", self.base_url)
    }

    pub fn document_url(&self, id: &str) -> String {
        format!("{}/documents/{id}", self.base_url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.bearer_token() {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, document_id: Option<&str>) -> Result<Response> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| PortalError::DocumentService(e.to_string()))?;

        match (response.status(), document_id) {
            (status, _) if status.is_success() => Ok(response),
            (StatusCode::UNAUTHORIZED, _) => {
                warn!("Document service rejected the session token");
                self.session.handle_unauthorized();
                Err(IdentityError::NotAuthenticated.into())
            }
            (StatusCode::NOT_FOUND, Some(id)) => Err(PortalError::DocumentNotFound(id.to_string())),
            (status, _) => Err(PortalError::DocumentService(format!(
                "document service returned status {status}"
            ))),
        }
    }
}

#[async_trait]
impl DocumentService for HttpDocumentService {
    async fn list(&self) -> Result<Vec<DocumentListItem>> {
        let url = self.list_url();
        debug!(url = %url, "Loading documents");
        self.send(self.client.get(&url), None)
            .await?
            .json::<Vec<DocumentListItem>>()
            .await
            .map_err(|e| PortalError::DocumentService(format!("malformed document list: {e}")))
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let url = self.document_url(id);
        debug!(url = %url, "Deleting document");
        self.send(self.client.delete(&url), Some(id)).await?;
        Ok(())
    }
}
