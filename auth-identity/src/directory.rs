//! Canned demo identities, one per role.
//!
//! These back the demo sign-in and the role-switch affordance used while
//! testing dashboards without a backend.

use crate::models::{Identity, Role};

fn identity(
    id: &str,
    name: &str,
    email: &str,
    role: Role,
    permissions: &[&str],
    department: Option<&str>,
) -> Identity {
    Identity {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        phone: None,
        role,
        avatar: None,
        permissions: Some(permissions.iter().map(|p| (*p).to_string()).collect()),
        department: department.map(str::to_string),
    }
}

/// Demo identity for `role`
pub fn demo_identity(role: Role) -> Identity {
    match role {
        Role::Doctor => identity(
            "1",
            "Dr. Sarah Johnson",
            "dr.johnson@hospital.com",
            role,
            &["patient_read", "patient_write", "prescription_write"],
            Some("Cardiology"),
        ),
        Role::Patient => identity(
            "2",
            "John Smith",
            "john.smith@email.com",
            role,
            &["own_records_read"],
            None,
        ),
        Role::Admin => identity(
            "3",
            "Admin User",
            "admin@hospital.com",
            role,
            &["all"],
            Some("Administration"),
        ),
        Role::Hr => identity(
            "4",
            "HR Manager",
            "hr@hospital.com",
            role,
            &["staff_read", "staff_write", "role_manage"],
            Some("Human Resources"),
        ),
        Role::Nurse => identity(
            "5",
            "Nurse Betty Wilson",
            "nurse.wilson@hospital.com",
            role,
            &["patient_read", "appointment_manage"],
            Some("General Medicine"),
        ),
        Role::Receptionist => identity(
            "6",
            "Reception Desk",
            "reception@hospital.com",
            role,
            &["patient_read", "appointment_manage", "patient_search"],
            Some("Front Desk"),
        ),
    }
}

/// Infer the demo role from the sign-in email.
///
/// Checked in order, first match wins; anything unrecognised signs in as a patient.
pub fn role_for_email(email: &str) -> Role {
    let email = email.to_ascii_lowercase();
    if email.contains("dr.") {
        Role::Doctor
    } else if email.contains("admin") {
        Role::Admin
    } else if email.contains("nurse") {
        Role::Nurse
    } else if email.contains("hr") {
        Role::Hr
    } else if email.contains("reception") {
        Role::Receptionist
    } else {
        Role::Patient
    }
}
