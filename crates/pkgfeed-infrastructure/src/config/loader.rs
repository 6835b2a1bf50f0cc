//! Configuration loader
//!
//! Handles loading configuration from TOML files, environment variables and
//! default values, merged with Figment.

use std::env;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use pkgfeed_domain::error::Result;
use pkgfeed_domain::value_objects::{
    DatabaseOptions, Lifetime, SearchOptions, SelectionMode, StorageOptions,
};

use crate::config::{AppConfig, LoggingConfig};
use crate::constants::{
    CONFIG_ENV_PREFIX, CONFIG_ENV_SEPARATOR, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILENAME,
};
use crate::error_ext::ErrorContext;
use crate::logging::{log_config_loaded, parse_log_level};

/// Configuration loader service
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration from all sources
    ///
    /// Sources are merged in this order (later sources override earlier):
    /// 1. Default values from `AppConfig::default()`
    /// 2. TOML configuration file (if it exists)
    /// 3. Environment variables with prefix (e.g., `PFS__STORAGE__TYPE`)
    ///
    /// Backend rules are not checked here; that is the validation pass run
    /// when a resolution root is created from the result.
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        match &self.config_path {
            Some(config_path) if config_path.exists() => {
                figment = figment.merge(Toml::file(config_path));
                log_config_loaded(config_path, true);
            }
            Some(config_path) => log_config_loaded(config_path, false),
            None => {
                if let Some(default_path) = Self::find_default_config_path() {
                    figment = figment.merge(Toml::file(&default_path));
                    log_config_loaded(&default_path, true);
                }
            }
        }

        let prefix = format!("{}{}", self.env_prefix, CONFIG_ENV_SEPARATOR);
        figment = figment.merge(Env::prefixed(&prefix).split(CONFIG_ENV_SEPARATOR));

        let app_config: AppConfig = figment
            .extract()
            .config_context("Failed to extract configuration")?;

        parse_log_level(&app_config.logging.level)?;
        Ok(app_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &AppConfig, path: P) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(config).config_context("Failed to serialize config to TOML")?;

        std::fs::write(path.as_ref(), toml_string).io_context("Failed to write config file")?;

        Ok(())
    }

    /// Get the current configuration file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Find the first existing default configuration file
    fn find_default_config_path() -> Option<PathBuf> {
        let current_dir = env::current_dir().ok()?;

        let candidates = [
            Some(current_dir.join(DEFAULT_CONFIG_FILENAME)),
            Some(
                current_dir
                    .join(DEFAULT_CONFIG_DIR)
                    .join(DEFAULT_CONFIG_FILENAME),
            ),
            dirs::config_dir().map(|d| d.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILENAME)),
            dirs::home_dir().map(|d| {
                d.join(format!(".{DEFAULT_CONFIG_DIR}"))
                    .join(DEFAULT_CONFIG_FILENAME)
            }),
        ];

        candidates.into_iter().flatten().find(|path| path.exists())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration builder for programmatic configuration
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: AppConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `key` on every push
    pub fn with_api_key<S: Into<String>>(mut self, key: S) -> Self {
        self.config.feed.api_key = Some(key.into());
        self
    }

    /// Set catalog configuration
    pub fn with_database(mut self, database: DatabaseOptions) -> Self {
        self.config.feed.database = database;
        self
    }

    /// Set blob storage configuration
    pub fn with_storage(mut self, storage: StorageOptions) -> Self {
        self.config.feed.storage = storage;
        self
    }

    /// Set search configuration
    pub fn with_search(mut self, search: SearchOptions) -> Self {
        self.config.feed.search = search;
        self
    }

    /// Set the selection mode
    pub fn with_selection_mode(mut self, mode: SelectionMode) -> Self {
        self.config.feed.resolution.mode = mode;
        self
    }

    /// Bound every construction by `secs` seconds
    pub fn with_construction_timeout(mut self, secs: u64) -> Self {
        self.config.feed.resolution.construction_timeout_secs = Some(secs);
        self
    }

    /// Override the lifetime of one capability
    pub fn with_lifetime<S: Into<String>>(mut self, capability: S, lifetime: Lifetime) -> Self {
        self.config
            .feed
            .resolution
            .lifetimes
            .insert(capability.into(), lifetime);
        self
    }

    /// Allow pushing over an existing version
    pub fn with_package_overwrites(mut self, allow: bool) -> Self {
        self.config.feed.allow_package_overwrites = allow;
        self
    }

    /// Set logging configuration
    pub fn with_logging(mut self, logging: LoggingConfig) -> Self {
        self.config.logging = logging;
        self
    }

    /// Build the configuration
    pub fn build(self) -> AppConfig {
        self.config
    }
}
