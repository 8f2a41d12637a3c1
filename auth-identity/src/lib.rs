//! Session identity for the Valuekare EMR portal
//!
//! This module provides:
//! - The fixed role enumeration and the `Identity` session subject
//! - Sign-in payload validation
//! - Demo and REST authenticators
//! - The session store: sign-in, sign-out, demo role switch
//!
//! # Example
//!
//! ```rust
//! use auth_identity::{Role, SessionStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = SessionStore::demo();
//!
//!     let identity = session.sign_in("dr.johnson@hospital.com", "password", None).await?;
//!     assert_eq!(identity.role, Role::Doctor);
//!
//!     session.switch_role(Role::Nurse);
//!     session.sign_out();
//!     Ok(())
//! }
//! ```

pub mod authenticator;
pub mod directory;
pub mod error;
pub mod models;
pub mod session;

pub use authenticator::*;
pub use directory::*;
pub use error::*;
pub use models::*;
pub use session::*;
