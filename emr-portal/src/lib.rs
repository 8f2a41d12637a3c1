//! Composition root for the Valuekare EMR portal
//!
//! This module provides:
//! - `PortalContext`, the explicitly passed bundle of session, directory,
//!   router and configuration
//! - Role dashboards and role-aware navigation
//! - Routes and an in-process history router
//! - The "my documents" list with optimistic deletion
//!
//! # Example
//!
//! ```rust
//! use auth_identity::Role;
//! use config_engine::PortalConfig;
//! use emr_portal::{Dashboard, PortalContext};
//!
//! let context = PortalContext::demo(PortalConfig::default());
//! context.session().switch_role(Role::Receptionist);
//! assert_eq!(context.dashboard(), Ok(Dashboard::FrontDesk));
//! ```

pub mod context;
pub mod dashboard;
pub mod documents;
pub mod error;
pub mod navigation;
pub mod routes;

pub use context::*;
pub use dashboard::*;
pub use documents::*;
pub use error::*;
pub use navigation::*;
pub use routes::*;
