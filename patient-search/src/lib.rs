//! Patient search for the Valuekare EMR portal
//!
//! This module provides:
//! - `SearchSession`, the debounce / race-guard state machine
//! - `SearchController`, a tokio task driving a session against a directory
//! - In-memory and REST patient directories
//! - Snapshot and view types for the presentation layer
//!
//! # Example
//!
//! ```rust
//! use auth_identity::{Role, SessionStore};
//! use logger_redacted::PiiRedactor;
//! use patient_search::{
//!     InMemoryPatientDirectory, SearchController, SearchKey, SearchOptions, SelectionHandler,
//! };
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = SessionStore::demo();
//!     session.switch_role(Role::Doctor);
//!
//!     let directory = Arc::new(InMemoryPatientDirectory::with_demo_patients(Duration::ZERO));
//!     let controller = SearchController::spawn(
//!         directory,
//!         session.subscribe(),
//!         SearchOptions::default(),
//!         SelectionHandler::callback(|patient: &patient_search::Patient| {
//!             println!("selected {}", patient.name);
//!         }),
//!         PiiRedactor::default(),
//!     );
//!
//!     controller.input("maria")?;
//!     controller.wait_for(|s| s.results.len() == 1).await?;
//!     controller.key(SearchKey::Enter)?;
//!     controller.shutdown().await?;
//!     Ok(())
//! }
//! ```

pub mod controller;
pub mod directory;
pub mod error;
pub mod http;
pub mod models;
pub mod session;
pub mod view;

pub use controller::*;
pub use directory::*;
pub use error::*;
pub use http::*;
pub use models::*;
pub use session::*;
pub use view::*;
