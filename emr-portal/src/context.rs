use crate::{
    dashboard::{dashboard_for, Dashboard},
    documents::{DocumentLibrary, DocumentService, HttpDocumentService, InMemoryDocumentService},
    error::PortalError,
    navigation::{navigation_for, NavItem},
    routes::HistoryRouter,
};
use auth_identity::{HttpAuthenticator, Role, SessionStore};
use auth_rbac::{can_search_patients, AccessDenial, RoleGuard};
use config_engine::{Backend, PortalConfig};
use logger_redacted::PiiRedactor;
use patient_search::{
    HttpPatientDirectory, InMemoryPatientDirectory, Patient, RecordDirectory, SearchController,
    SearchOptions, SelectionHandler,
};
use std::sync::Arc;
use tracing::info;

/// Caller-supplied reaction to a chosen patient
pub type PatientCallback = Arc<dyn Fn(&Patient) + Send + Sync>;

/// Everything a portal view needs, passed in explicitly.
///
/// Views receive the context when they are built; nothing here is reachable
/// through a global.
#[derive(Clone)]
pub struct PortalContext {
    config: Arc<PortalConfig>,
    session: Arc<SessionStore>,
    directory: Arc<dyn RecordDirectory<Record = Patient>>,
    documents: Arc<dyn DocumentService>,
    router: Arc<HistoryRouter>,
    redactor: PiiRedactor,
}

impl PortalContext {
    pub fn new(
        config: PortalConfig,
        session: Arc<SessionStore>,
        directory: Arc<dyn RecordDirectory<Record = Patient>>,
        documents: Arc<dyn DocumentService>,
        router: Arc<HistoryRouter>,
    ) -> Self {
        let redactor = PiiRedactor::from_logger_config(&config.logging);
        Self {
            config: Arc::new(config),
            session,
            directory,
            documents,
            router,
            redactor,
        }
    }

    /// Demo wiring: demo sign-in, in-memory patients and documents
    pub fn demo(config: PortalConfig) -> Self {
        let directory = Arc::new(InMemoryPatientDirectory::with_demo_patients(
            config.mock_latency(),
        ));
        Self::new(
            config,
            Arc::new(SessionStore::demo()),
            directory,
            Arc::new(InMemoryDocumentService::seeded()),
            Arc::new(HistoryRouter::new()),
        )
    }

    /// REST wiring against `api.base_url`: sign-in, patient search and
    /// documents all share one session, so its bearer token is sent on every
    /// call and a 401 from any of them signs it out.
    pub fn http(config: PortalConfig) -> Result<Self, PortalError> {
        let base_url = config.api.base_url.clone();
        let timeout = config.request_timeout();

        let authenticator = HttpAuthenticator::new(&base_url, timeout)?;
        let session = Arc::new(SessionStore::new(Arc::new(authenticator)));
        let directory = HttpPatientDirectory::new(&base_url, timeout, Arc::clone(&session))?;
        let documents = HttpDocumentService::new(&base_url, timeout, Arc::clone(&session))?;

        info!(base_url = %base_url, "Portal wired to REST backend");
        Ok(Self::new(
            config,
            session,
            Arc::new(directory),
            Arc::new(documents),
            Arc::new(HistoryRouter::new()),
        ))
    }

    /// Wiring chosen by `api.backend`
    pub fn from_config(config: PortalConfig) -> Result<Self, PortalError> {
        match config.api.backend {
            Backend::Demo => Ok(Self::demo(config)),
            Backend::Http => Self::http(config),
        }
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn router(&self) -> &Arc<HistoryRouter> {
        &self.router
    }

    /// Guard for the patient search screen: staff only
    pub fn patient_search_guard() -> RoleGuard {
        RoleGuard::new(Role::ALL.into_iter().filter(|role| role.is_staff()))
    }

    /// Mount the patient search view for the current identity.
    ///
    /// Without `on_select`, choosing a patient navigates to its details page.
    pub fn open_patient_search(
        &self,
        on_select: Option<PatientCallback>,
    ) -> Result<SearchController<Patient>, AccessDenial> {
        let identity = self.session.current();
        can_search_patients(identity.as_ref())?;
        Self::patient_search_guard().evaluate(identity.as_ref())?;

        let navigator: Arc<dyn patient_search::DetailsNavigator> = self.router.clone();
        let controller = SearchController::spawn(
            Arc::clone(&self.directory),
            self.session.subscribe(),
            SearchOptions::from(self.config.as_ref()),
            SelectionHandler::or_navigate(on_select, navigator),
            self.redactor.clone(),
        );
        info!(session = %controller.session_id(), "Patient search opened");
        Ok(controller)
    }

    pub fn dashboard(&self) -> Result<Dashboard, AccessDenial> {
        self.session
            .current()
            .map(|identity| dashboard_for(identity.role))
            .ok_or(AccessDenial::Unauthenticated)
    }

    pub fn navigation(&self) -> Vec<NavItem> {
        navigation_for(self.session.current().as_ref())
    }

    /// Document list for the "my documents" screen, loaded from the service
    pub fn document_library(&self) -> DocumentLibrary {
        DocumentLibrary::new(Arc::clone(&self.documents))
    }
}
