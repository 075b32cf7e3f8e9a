//! Prospect Core - shared foundation for the Prospect workspace.
//!
//! Provides the central error type, TOML-based configuration with
//! environment overrides, and validated newtypes used across all crates.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod error;
pub mod types;

pub use config::{ApiConfig, AppConfig, BatchConfig};
pub use error::{ConfigError, ConfigResult, ProspectError, Result};
pub use types::{ApiKey, PersonId};
