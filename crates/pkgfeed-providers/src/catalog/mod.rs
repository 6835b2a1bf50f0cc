//! Catalog Provider Implementations
//!
//! | Provider | Capability | Applies when |
//! |----------|------------|--------------|
//! | `MemoryContextProvider` | context | `database.type = "memory"` |
//! | `JsonContextProvider` | context | `database.type = "json"` |
//! | `CatalogDatabaseProvider` | database | always (over the scoped context) |

pub mod database;
pub mod json;
pub mod memory;

pub use database::{CatalogDatabaseProvider, CatalogPackageDatabase};
pub use json::{JsonContextProvider, JsonPackageContext};
pub use memory::{MemoryContextProvider, MemoryPackageContext};

use pkgfeed_domain::value_objects::Package;

/// Catalog key of a package id
pub(crate) fn catalog_key(id: &str) -> String {
    id.to_lowercase()
}

/// Replace or append `package` in a version list
pub(crate) fn upsert_version(versions: &mut Vec<Package>, package: Package) {
    match versions
        .iter_mut()
        .find(|p| p.is(&package.id, &package.version))
    {
        Some(existing) => *existing = package,
        None => versions.push(package),
    }
}
