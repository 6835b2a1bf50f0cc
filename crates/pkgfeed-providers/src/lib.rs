//! # pkgfeed - Provider Implementations
//!
//! Concrete backends for every capability, each wrapped in a
//! `CapabilityProvider` that decides from the configuration snapshot whether
//! it applies.
//!
//! ## Provider Categories
//!
//! | Capability | Providers (priority order) |
//! |------------|----------------------------|
//! | context | `memory`, `json` |
//! | database | `catalog` |
//! | storage | `file`, `memory` |
//! | search | `database`, `null` |
//! | search_indexer | `null` |
//!
//! ## Usage
//!
//! ```ignore
//! let mut registry = ProviderRegistry::new();
//! pkgfeed_providers::register_all(&mut registry)?;
//! let root = ServiceRoot::new(config, Arc::new(registry))?;
//! ```

use pkgfeed_application::registry::ProviderRegistry;
use pkgfeed_domain::error::Result;

/// Provider-specific constants
pub mod constants;

/// Catalog context and package database providers
pub mod catalog;

/// Blob storage providers
pub mod storage;

/// Search and search indexer providers
pub mod search;

/// Register every bundled provider, in priority order
///
/// Registration order decides which provider wins when several apply, so
/// hosts adding their own providers should do so before or after this call
/// depending on the precedence they want.
pub fn register_all(registry: &mut ProviderRegistry) -> Result<()> {
    registry
        .register(catalog::MemoryContextProvider::new())?
        .register(catalog::JsonContextProvider::new())?
        .register(catalog::CatalogDatabaseProvider::new())?
        .register(storage::FileStorageProvider::new())?
        .register(storage::MemoryStorageProvider::new())?
        .register(search::DatabaseSearchProvider::new())?
        .register(search::NullSearchProvider)?
        .register(search::NullSearchIndexerProvider)?;
    Ok(())
}
