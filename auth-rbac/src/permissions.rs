//! Permission strings understood by the portal.
//!
//! Permissions are an open set of plain strings; these constants only name
//! the ones the portal itself checks. [`ALL`] is the wildcard and is matched
//! by string equality, nothing more.

pub const ALL: &str = "all";

pub const PATIENT_READ: &str = "patient_read";
pub const PATIENT_WRITE: &str = "patient_write";
pub const PATIENT_SEARCH: &str = "patient_search";
pub const OWN_RECORDS_READ: &str = "own_records_read";
pub const PRESCRIPTION_WRITE: &str = "prescription_write";
pub const APPOINTMENT_MANAGE: &str = "appointment_manage";
pub const STAFF_READ: &str = "staff_read";
pub const STAFF_WRITE: &str = "staff_write";
pub const ROLE_MANAGE: &str = "role_manage";

/// Any one of these lets a caller search patients
pub const PATIENT_SEARCH_ANY: [&str; 3] = [PATIENT_SEARCH, PATIENT_READ, ALL];
