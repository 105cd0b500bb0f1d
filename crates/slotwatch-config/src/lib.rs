//! # slotwatch Config
//!
//! Configuration management for the slotwatch appointment watcher.
//!
//! The configuration is loaded once at startup from a TOML file and never
//! mutated afterwards. `${VAR}` references are substituted from the
//! environment, which keeps the session token out of the file itself.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
