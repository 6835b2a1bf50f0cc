//! # pkgfeed
//!
//! Package feed host whose catalog, blob storage and search backends are
//! chosen from configuration at startup.
//!
//! ## Example
//!
//! ```ignore
//! use pkgfeed::infrastructure::config::ConfigLoader;
//! use pkgfeed::infrastructure::di::{AppContext, indexing_service};
//!
//! let context = AppContext::init(ConfigLoader::new().load()?)?;
//! let scope = context.begin_scope();
//! let indexer = indexing_service(&scope).await?;
//! ```
//!
//! ## Architecture
//!
//! - `domain` - ports, configuration snapshot, errors
//! - `application` - provider registry, resolution, use cases
//! - `providers` - bundled backends
//! - `infrastructure` - config loading, logging, composition root
//! - `cli` - the `pkgfeed` command

pub mod cli;

/// Domain layer - ports, value objects and errors
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use pkgfeed_domain::*;
}

/// Application layer - registry, resolution and use cases
pub mod application {
    pub use pkgfeed_application::*;
}

/// Bundled backend providers
pub mod providers {
    pub use pkgfeed_providers::*;
}

/// Infrastructure layer - config, logging and the composition root
pub mod infrastructure {
    pub use pkgfeed_infrastructure::*;
}

pub use cli::{Cli, Command, run};
pub use domain::{Error, Result};
