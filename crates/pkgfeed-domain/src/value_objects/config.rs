//! Configuration snapshot
//!
//! Typed view of the user-supplied settings that decide which backend serves
//! each capability. A snapshot is deserialized once and never mutated; a
//! reload produces a new one.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default catalog backend
pub const DEFAULT_DATABASE_TYPE: &str = "memory";

/// Default blob storage backend
pub const DEFAULT_STORAGE_TYPE: &str = "file";

/// Default search backend
pub const DEFAULT_SEARCH_TYPE: &str = "database";

/// How instances of a capability are shared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifetime {
    /// One instance for the whole resolution context, shared by every scope
    Singleton,
    /// One instance per scope (unit of work)
    Scoped,
    /// A fresh instance on every request
    Transient,
}

impl std::fmt::Display for Lifetime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Singleton => "singleton",
            Self::Scoped => "scoped",
            Self::Transient => "transient",
        };
        f.pad(name)
    }
}

/// Policy applied when more than one provider claims a capability
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// The earliest registered applicable provider wins; the rest are logged
    #[default]
    FirstMatch,
    /// Several applicable providers are a misconfiguration
    Strict,
}

/// Compare a configured backend type against a provider's type name
///
/// Matching ignores ASCII case and surrounding whitespace.
pub fn backend_type_matches(configured: &str, expected: &str) -> bool {
    configured.trim().eq_ignore_ascii_case(expected)
}

/// Catalog settings (`[database]`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseOptions {
    /// Backend family (`memory`, `json`)
    #[serde(rename = "type")]
    pub kind: String,
    /// Backend-specific connection string (file path for `json`)
    pub connection_string: Option<String>,
}

impl DatabaseOptions {
    /// Whether the configured backend is `name`
    pub fn is_type(&self, name: &str) -> bool {
        backend_type_matches(&self.kind, name)
    }
}

impl Default for DatabaseOptions {
    fn default() -> Self {
        Self {
            kind: DEFAULT_DATABASE_TYPE.to_string(),
            connection_string: None,
        }
    }
}

/// Blob storage settings (`[storage]`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageOptions {
    /// Backend family (`file`, `memory`)
    #[serde(rename = "type")]
    pub kind: String,
    /// Root directory for file storage
    pub path: Option<PathBuf>,
}

impl StorageOptions {
    /// Whether the configured backend is `name`
    pub fn is_type(&self, name: &str) -> bool {
        backend_type_matches(&self.kind, name)
    }
}

impl Default for StorageOptions {
    fn default() -> Self {
        Self {
            kind: DEFAULT_STORAGE_TYPE.to_string(),
            path: None,
        }
    }
}

/// Search settings (`[search]`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Backend family (`database`, `null`)
    #[serde(rename = "type")]
    pub kind: String,
}

impl SearchOptions {
    /// Whether the configured backend is `name`
    pub fn is_type(&self, name: &str) -> bool {
        backend_type_matches(&self.kind, name)
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            kind: DEFAULT_SEARCH_TYPE.to_string(),
        }
    }
}

/// Resolution policy (`[resolution]`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionOptions {
    /// Tie-break policy when several providers apply
    pub mode: SelectionMode,
    /// Upper bound for a single construction, in seconds
    pub construction_timeout_secs: Option<u64>,
    /// Lifetime overrides keyed by capability name
    pub lifetimes: BTreeMap<String, Lifetime>,
}

/// Complete configuration snapshot consumed by the resolution layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Key required to push packages, if any
    pub api_key: Option<String>,
    /// Whether pushing an existing version replaces it
    pub allow_package_overwrites: bool,
    /// Catalog backend
    pub database: DatabaseOptions,
    /// Blob storage backend
    pub storage: StorageOptions,
    /// Search backend
    pub search: SearchOptions,
    /// Resolution policy
    pub resolution: ResolutionOptions,
}
