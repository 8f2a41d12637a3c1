use crate::routes::Route;
use auth_identity::{Identity, Role};
use auth_rbac::{permissions, Permissions};

/// Sidebar entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub route: Route,
    /// Hidden unless the identity holds this permission
    pub required_permission: Option<&'static str>,
}

impl NavItem {
    fn open(label: &'static str, route: Route) -> Self {
        Self {
            label,
            route,
            required_permission: None,
        }
    }

    fn gated(label: &'static str, route: Route, permission: &'static str) -> Self {
        Self {
            label,
            route,
            required_permission: Some(permission),
        }
    }
}

fn items_for(role: Role) -> Vec<NavItem> {
    match role {
        Role::Doctor => vec![
            NavItem::open("Dashboard", Route::Dashboard),
            NavItem::gated("Patients", Route::Patients, permissions::PATIENT_READ),
            NavItem::open("Appointments", Route::Appointments),
            NavItem::gated("Records", Route::Records, permissions::PATIENT_READ),
            NavItem::gated(
                "Prescriptions",
                Route::Prescriptions,
                permissions::PRESCRIPTION_WRITE,
            ),
        ],
        Role::Patient => vec![
            NavItem::open("Dashboard", Route::Dashboard),
            NavItem::gated("My Records", Route::MyRecords, permissions::OWN_RECORDS_READ),
            NavItem::open("Appointments", Route::Appointments),
            NavItem::open("Documents", Route::Documents),
            NavItem::open("Risk Assessment", Route::RiskAssessment),
        ],
        Role::Admin => vec![
            NavItem::open("Dashboard", Route::Dashboard),
            NavItem::gated("Users", Route::Users, permissions::STAFF_READ),
            NavItem::open("System Logs", Route::Logs),
            NavItem::open("Analytics", Route::Analytics),
            NavItem::open("Settings", Route::Settings),
        ],
        Role::Hr => vec![
            NavItem::open("Dashboard", Route::Dashboard),
            NavItem::gated("Staff", Route::Staff, permissions::STAFF_READ),
            NavItem::gated("Roles & Permissions", Route::Roles, permissions::ROLE_MANAGE),
            NavItem::open("Analytics", Route::Analytics),
        ],
        Role::Nurse => vec![
            NavItem::open("Dashboard", Route::Dashboard),
            NavItem::gated(
                "Patient Search",
                Route::PatientSearch,
                permissions::PATIENT_READ,
            ),
            NavItem::gated(
                "Appointments",
                Route::Appointments,
                permissions::APPOINTMENT_MANAGE,
            ),
            NavItem::gated("Records", Route::Records, permissions::PATIENT_READ),
        ],
        Role::Receptionist => vec![
            NavItem::open("Dashboard", Route::Dashboard),
            NavItem::gated(
                "Patient Search",
                Route::PatientSearch,
                permissions::PATIENT_SEARCH,
            ),
            NavItem::gated(
                "Appointments",
                Route::Appointments,
                permissions::APPOINTMENT_MANAGE,
            ),
            NavItem::gated("Book", Route::Book, permissions::APPOINTMENT_MANAGE),
        ],
    }
}

/// Sidebar for the signed-in identity; empty when signed out
pub fn navigation_for(identity: Option<&Identity>) -> Vec<NavItem> {
    let view = Permissions::for_identity(identity);
    let Some(role) = view.role() else {
        return Vec::new();
    };

    items_for(role)
        .into_iter()
        .filter(|item| {
            item.required_permission
                .map_or(true, |permission| view.has_permission(permission))
        })
        .collect()
}
