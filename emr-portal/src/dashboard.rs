use auth_identity::Role;
use serde::Serialize;

/// Landing view shown after sign-in, one per role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dashboard {
    Doctor,
    Patient,
    Admin,
    HumanResources,
    Nursing,
    FrontDesk,
}

/// The single role to dashboard dispatch site
pub fn dashboard_for(role: Role) -> Dashboard {
    match role {
        Role::Doctor => Dashboard::Doctor,
        Role::Patient => Dashboard::Patient,
        Role::Admin => Dashboard::Admin,
        Role::Hr => Dashboard::HumanResources,
        Role::Nurse => Dashboard::Nursing,
        Role::Receptionist => Dashboard::FrontDesk,
    }
}

impl Dashboard {
    pub fn title(self) -> &'static str {
        match self {
            Dashboard::Doctor => "Doctor Dashboard",
            Dashboard::Patient => "Patient Dashboard",
            Dashboard::Admin => "Admin Dashboard",
            Dashboard::HumanResources => "Human Resource Management",
            Dashboard::Nursing => "Nursing Station",
            Dashboard::FrontDesk => "Front Desk",
        }
    }

    pub fn panels(self) -> &'static [&'static str] {
        match self {
            Dashboard::Doctor => &[
                "Total Patients",
                "Today's Appointments",
                "Critical Patients",
                "Patient Records",
                "Today's Schedule",
            ],
            Dashboard::Patient => &[
                "Health Metrics",
                "Upcoming Appointments",
                "Recent Medical Documents",
            ],
            Dashboard::Admin => &["System Stats", "Recent Users"],
            Dashboard::HumanResources => &[
                "Staff Directory",
                "Role & Permission Management",
                "HR Analytics",
            ],
            Dashboard::Nursing => &["Patient Search", "Today's Appointments"],
            Dashboard::FrontDesk => &["Patient Search", "Appointment Booking"],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_role_has_its_own_dashboard() {
        let dashboards: HashSet<Dashboard> = Role::ALL.into_iter().map(dashboard_for).collect();
        assert_eq!(dashboards.len(), Role::ALL.len());
        for dashboard in dashboards {
            assert!(!dashboard.title().is_empty());
            assert!(!dashboard.panels().is_empty());
        }
    }

    #[test]
    fn hr_lands_on_staff_management() {
        assert_eq!(
            dashboard_for(Role::Hr).title(),
            "Human Resource Management"
        );
    }
}
