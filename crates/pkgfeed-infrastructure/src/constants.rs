//! Infrastructure Constants

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "pkgfeed.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "pkgfeed";

/// Environment variable prefix for configuration overrides
pub const CONFIG_ENV_PREFIX: &str = "PFS";

/// Separator between prefix and nested keys (`PFS__STORAGE__TYPE`)
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable holding an `EnvFilter` directive
pub const LOG_ENV_FILTER: &str = "PFS_LOG";

/// File name prefix of rolling log files
pub const LOG_FILE_PREFIX: &str = "pkgfeed";
