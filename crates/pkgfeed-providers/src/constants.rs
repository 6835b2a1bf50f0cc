//! Provider Constants
//!
//! Type names and defaults of the bundled backends. Type names are matched
//! against the `type` keys of the configuration snapshot.

// ============================================================================
// CATALOG
// ============================================================================

/// `database.type` served by the in-memory catalog
pub const DATABASE_TYPE_MEMORY: &str = "memory";

/// `database.type` served by the JSON file catalog
pub const DATABASE_TYPE_JSON: &str = "json";

// ============================================================================
// STORAGE
// ============================================================================

/// `storage.type` served by local file storage
pub const STORAGE_TYPE_FILE: &str = "file";

/// Alternate spelling accepted for local file storage
pub const STORAGE_TYPE_FILESYSTEM: &str = "filesystem";

/// `storage.type` served by in-process storage
pub const STORAGE_TYPE_MEMORY: &str = "memory";

/// Root directory of file storage when `storage.path` is not set
pub const DEFAULT_STORAGE_ROOT: &str = "data";

// ============================================================================
// SEARCH
// ============================================================================

/// `search.type` served by catalog search
pub const SEARCH_TYPE_DATABASE: &str = "database";

/// `search.type` that disables search
pub const SEARCH_TYPE_NULL: &str = "null";
