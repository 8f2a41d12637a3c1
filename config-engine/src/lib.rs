//! Configuration management for the Valuekare EMR portal
//!
//! This module provides layered configuration with:
//! - Built-in defaults for every setting
//! - An optional YAML file
//! - `EMR_*` environment variables (and `.env` files)
//! - Validation before the configuration is handed out
//!
//! # Example
//!
//! ```rust,no_run
//! use config_engine::ConfigLoader;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConfigLoader::new()
//!         .with_file("emr-portal.yaml")
//!         .with_dotenv()
//!         .load()?;
//!
//!     println!("debounce: {:?}", config.debounce());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod loader;
pub mod portal;

pub use error::*;
pub use loader::*;
pub use portal::*;
