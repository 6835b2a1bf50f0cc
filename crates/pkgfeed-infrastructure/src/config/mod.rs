//! Configuration loading
//!
//! [`ConfigLoader`] merges defaults, a TOML file and `PFS__` environment
//! variables into an [`AppConfig`]. The feed part of the result is the
//! snapshot handed to the resolution layer.

pub mod loader;
pub mod types;

pub use loader::{ConfigBuilder, ConfigLoader};
pub use types::{AppConfig, LoggingConfig};
