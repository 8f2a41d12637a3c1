use patient_search::DetailsNavigator;
use std::fmt;
use tokio::sync::watch;
use tracing::debug;

/// Portal screens addressable by path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Dashboard,
    Auth,
    Book,
    Appointments,
    Documents,
    MyRecords,
    RiskAssessment,
    PatientSearch,
    Patients,
    PatientDetails { id: String },
    Records,
    Prescriptions,
    Users,
    Logs,
    Analytics,
    Settings,
    Staff,
    Roles,
    NotFound(String),
}

impl Route {
    pub fn path(&self) -> String {
        let path = match self {
            Route::Home => "/",
            Route::Dashboard => "/dashboard",
            Route::Auth => "/auth",
            Route::Book => "/book",
            Route::Appointments => "/appointments",
            Route::Documents => "/documents",
            Route::MyRecords => "/my-records",
            Route::RiskAssessment => "/risk-assessment",
            Route::PatientSearch => "/patient-search",
            Route::Patients => "/patients",
            Route::PatientDetails { id } => return format!("/patients/{id}"),
            Route::Records => "/records",
            Route::Prescriptions => "/prescriptions",
            Route::Users => "/users",
            Route::Logs => "/logs",
            Route::Analytics => "/analytics",
            Route::Settings => "/settings",
            Route::Staff => "/staff",
            Route::Roles => "/roles",
            Route::NotFound(path) => return path.clone(),
        };
        path.to_string()
    }

    /// Unknown paths map to [`Route::NotFound`]
    pub fn parse(path: &str) -> Route {
        let trimmed = match path.trim_end_matches('/') {
            "" => "/",
            other => other,
        };
        match trimmed {
            "/" => Route::Home,
            "/dashboard" => Route::Dashboard,
            "/auth" => Route::Auth,
            "/book" => Route::Book,
            "/appointments" => Route::Appointments,
            "/documents" => Route::Documents,
            "/my-records" => Route::MyRecords,
            "/risk-assessment" => Route::RiskAssessment,
            "/patient-search" => Route::PatientSearch,
            "/patients" => Route::Patients,
            "/records" => Route::Records,
            "/prescriptions" => Route::Prescriptions,
            "/users" => Route::Users,
            "/logs" => Route::Logs,
            "/analytics" => Route::Analytics,
            "/settings" => Route::Settings,
            "/staff" => Route::Staff,
            "/roles" => Route::Roles,
            other => match other.strip_prefix("/patients/") {
                Some(id) if !id.is_empty() && !id.contains('/') => Route::PatientDetails {
                    id: id.to_string(),
                },
                _ => Route::NotFound(path.to_string()),
            },
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Navigation collaborator
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
    fn current(&self) -> Route;
}

/// In-process router that records every navigation.
///
/// History is published through a `watch` channel so views can follow the
/// current route.
#[derive(Debug)]
pub struct HistoryRouter {
    history: watch::Sender<Vec<Route>>,
}

impl Default for HistoryRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryRouter {
    pub fn new() -> Self {
        Self {
            history: watch::Sender::new(vec![Route::Dashboard]),
        }
    }

    pub fn history(&self) -> Vec<Route> {
        self.history.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Route>> {
        self.history.subscribe()
    }

    /// Pop the current route; the first entry is never removed
    pub fn back(&self) -> Route {
        self.history.send_modify(|history| {
            if history.len() > 1 {
                history.pop();
            }
        });
        self.current()
    }
}

impl Navigator for HistoryRouter {
    fn navigate(&self, route: Route) {
        debug!(path = %route, "Navigating");
        self.history.send_modify(|history| history.push(route));
    }

    fn current(&self) -> Route {
        self.history
            .borrow()
            .last()
            .cloned()
            .unwrap_or(Route::Dashboard)
    }
}

impl DetailsNavigator for HistoryRouter {
    fn open_details(&self, record_id: &str) {
        self.navigate(Route::PatientDetails {
            id: record_id.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_parse_back_to_routes() {
        for route in [
            Route::Home,
            Route::Dashboard,
            Route::PatientSearch,
            Route::MyRecords,
            Route::RiskAssessment,
            Route::PatientDetails { id: "1".into() },
            Route::Roles,
        ] {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }

    #[test]
    fn unknown_paths_are_not_found() {
        assert_eq!(
            Route::parse("/patients/1/notes"),
            Route::NotFound("/patients/1/notes".into())
        );
        assert_eq!(Route::parse("/billing"), Route::NotFound("/billing".into()));
        assert_eq!(Route::parse("/dashboard/"), Route::Dashboard);
        assert_eq!(Route::parse(""), Route::Home);
    }

    #[test]
    fn details_navigation_is_recorded() {
        let router = HistoryRouter::new();
        router.open_details("3");
        assert_eq!(router.current().path(), "/patients/3");
        assert_eq!(router.back(), Route::Dashboard);
        assert_eq!(router.back(), Route::Dashboard);
        assert_eq!(router.history().len(), 1);
    }
}
