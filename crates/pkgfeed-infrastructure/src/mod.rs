//! # Infrastructure Layer
//!
//! Host-side concerns around the resolution layer.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Figment configuration loading (TOML + `PFS__` env) |
//! | [`constants`] | Centralized configuration constants |
//! | [`di`] | Bundled registry, `AppContext`, reload, diagnostics |
//! | [`error_ext`] | Context extensions for foreign errors |
//! | [`logging`] | Structured logging with tracing |

pub mod config;
pub mod constants;
pub mod di;
pub mod error_ext;
pub mod logging;

pub use error_ext::ErrorContext;
