//! Error handling types

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// A single configuration rule violation, reported with the setting it concerns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    /// Dotted setting path (e.g. `database.connection_string`)
    pub setting: String,
    /// Human-readable description of the violation
    pub message: String,
}

impl ValidationFailure {
    /// Create a new validation failure
    pub fn new<S: Into<String>, M: Into<String>>(setting: S, message: M) -> Self {
        Self {
            setting: setting.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.setting, self.message)
    }
}

fn join_failures(failures: &[ValidationFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Main error type for pkgfeed
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// JSON parsing or serialization error
    #[error("JSON parsing error: {source}")]
    Json {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },

    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The configuration snapshot failed one or more validation rules
    #[error(
        "Configuration validation failed ({} problem(s)): {}",
        .failures.len(),
        join_failures(.failures)
    )]
    Validation {
        /// Every failure found in the snapshot
        failures: Vec<ValidationFailure>,
    },

    /// No registered provider applies to the configuration
    #[error(
        "No backend configured for capability '{capability}'; providers considered: [{}]",
        .considered.join(", ")
    )]
    NoProvider {
        /// Capability being resolved
        capability: &'static str,
        /// Every provider registered for the capability, in order
        considered: Vec<&'static str>,
    },

    /// More than one provider applies and strict selection is enabled
    #[error(
        "Ambiguous backend for capability '{capability}': [{}] all apply",
        .candidates.join(", ")
    )]
    AmbiguousProvider {
        /// Capability being resolved
        capability: &'static str,
        /// Applicable providers, in registration order
        candidates: Vec<&'static str>,
    },

    /// A provider was registered after resolution had started
    #[error("Cannot register provider for '{capability}': resolution has already started")]
    RegistrationClosed {
        /// Capability the late registration targeted
        capability: &'static str,
    },

    /// Providers depend on each other in a loop
    #[error("Dependency cycle while resolving: {}", .chain.join(" -> "))]
    DependencyCycle {
        /// Capabilities on the resolution path, ending with the repeated one
        chain: Vec<&'static str>,
    },

    /// A provider requested a capability it did not declare
    #[error("Provider '{provider}' for '{capability}' requested undeclared dependency '{dependency}'")]
    UndeclaredDependency {
        /// Capability the provider was building
        capability: &'static str,
        /// Provider that made the request
        provider: &'static str,
        /// Capability that was requested
        dependency: &'static str,
    },

    /// The selected provider failed to build its implementation
    #[error("Failed to build '{provider}' for capability '{capability}': {source}")]
    Construction {
        /// Capability being resolved
        capability: &'static str,
        /// Selected provider
        provider: &'static str,
        /// Factory error
        #[source]
        source: Box<Error>,
    },

    /// Construction was abandoned because the unit of work was cancelled
    #[error("Construction of '{capability}' was cancelled")]
    Cancelled {
        /// Capability being resolved
        capability: &'static str,
    },

    /// Construction exceeded the configured time limit
    #[error("Construction of '{capability}' timed out after {after:?}")]
    Timeout {
        /// Capability being resolved
        capability: &'static str,
        /// Configured limit
        after: Duration,
    },

    /// Invalid argument provided to a function
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument
        message: String,
    },

    /// Blob storage error
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Failure in host infrastructure such as logging setup
    #[error("Infrastructure error: {message}")]
    Infrastructure {
        /// Description of the failure
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

// Basic error creation methods
impl Error {
    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create an I/O error with source
    pub fn io_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a storage error
    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage {
            message: message.into(),
            source: None,
        }
    }

    /// Create a storage error with source
    pub fn storage_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Storage {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Configuration and resolution error creation methods
impl Error {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a batch validation error
    pub fn validation(failures: Vec<ValidationFailure>) -> Self {
        Self::Validation { failures }
    }

    /// Create a "no backend configured" error
    pub fn no_provider(capability: &'static str, considered: Vec<&'static str>) -> Self {
        Self::NoProvider {
            capability,
            considered,
        }
    }

    /// Create an ambiguous selection error
    pub fn ambiguous_provider(capability: &'static str, candidates: Vec<&'static str>) -> Self {
        Self::AmbiguousProvider {
            capability,
            candidates,
        }
    }

    /// Wrap a factory failure with the capability and provider that raised it
    pub fn construction(capability: &'static str, provider: &'static str, source: Error) -> Self {
        Self::Construction {
            capability,
            provider,
            source: Box::new(source),
        }
    }

    /// Create a cancellation error
    pub fn cancelled(capability: &'static str) -> Self {
        Self::Cancelled { capability }
    }

    /// Create a timeout error
    pub fn timeout(capability: &'static str, after: Duration) -> Self {
        Self::Timeout { capability, after }
    }
}

impl Error {
    /// Whether the error reflects a deployment misconfiguration
    ///
    /// Fatal errors should abort startup; the rest only fail the unit of work
    /// that hit them.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. }
                | Self::Validation { .. }
                | Self::NoProvider { .. }
                | Self::AmbiguousProvider { .. }
                | Self::RegistrationClosed { .. }
                | Self::DependencyCycle { .. }
                | Self::UndeclaredDependency { .. }
        )
    }

    /// The innermost error behind nested construction failures
    pub fn root_cause(&self) -> &Error {
        let mut current = self;
        while let Self::Construction { source, .. } = current {
            current = &**source;
        }
        current
    }

    /// Validation failures carried by this error, if any
    pub fn validation_failures(&self) -> &[ValidationFailure] {
        match self {
            Self::Validation { failures } => failures,
            _ => &[],
        }
    }
}
