//! Role and permission authorization for the Valuekare EMR portal
//!
//! Pure, synchronous capability checks over the session [`Identity`]:
//! - `has_permission`, `has_role`, `has_any_role` queries
//! - `can_render` / `authorize` composite gate for protected views
//! - `RoleGuard` declarative guard with fallback handling
//!
//! Nothing here performs I/O or keeps state; every answer is derived from
//! the identity passed in.
//!
//! # Example
//!
//! ```rust
//! use auth_identity::{demo_identity, Role};
//! use auth_rbac::{has_permission, RoleGuard};
//!
//! let nurse = demo_identity(Role::Nurse);
//! assert!(has_permission(Some(&nurse), "patient_read"));
//!
//! let guard = RoleGuard::new([Role::Hr, Role::Admin]).require_permission("staff_write");
//! let denial = guard.evaluate(Some(&nurse)).unwrap_err();
//! assert_eq!(denial.missing_permission(), Some("staff_write"));
//! ```
//!
//! [`Identity`]: auth_identity::Identity

pub mod error;
pub mod guard;
pub mod permissions;
pub mod resolver;

pub use error::*;
pub use guard::*;
pub use resolver::*;
