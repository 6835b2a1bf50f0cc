//! Configuration types

use std::path::PathBuf;

use pkgfeed_domain::value_objects::FeedConfig;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_LOG_LEVEL;

/// Logging configuration (`[logging]`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON output format
    pub json_format: bool,

    /// Also write daily rolling log files at this path
    pub file_output: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            json_format: false,
            file_output: None,
        }
    }
}

/// Complete application configuration
///
/// Feed settings sit at the top level of the file; `[logging]` is consumed
/// by the host only and never reaches the resolution layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Backend selection and feed behaviour
    #[serde(flatten)]
    pub feed: FeedConfig,

    /// Logging
    #[serde(default)]
    pub logging: LoggingConfig,
}
