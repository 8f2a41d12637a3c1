//! Common error handling utilities for the Valuekare EMR portal
//!
//! This module provides the standardized error taxonomy and error codes
//! shared by every crate in the workspace.
//!
//! # Error Categories
//!
//! - **Unauthenticated**: no session identity; gated content asks the user to sign in
//! - **Unauthorized**: identity present, role or permission check failed
//! - **Transport / Timeout**: a backend collaborator failed or did not answer
//! - **Validation**: payload or input validation errors
//! - **Config / Internal**: faults that are logged but never shown verbatim
//!
//! # Example
//!
//! ```rust
//! use error_common::{EmrError, log_error};
//!
//! fn require_sign_in(signed_in: bool) -> Result<(), EmrError> {
//!     if !signed_in {
//!         let err = EmrError::Unauthenticated;
//!         log_error("patient_search", &err);
//!         return Err(err);
//!     }
//!     Ok(())
//! }
//!
//! assert!(require_sign_in(false).is_err());
//! ```

pub mod codes;
pub mod types;

pub use types::*;
