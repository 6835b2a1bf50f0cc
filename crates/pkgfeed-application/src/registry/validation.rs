//! Configuration validation pass
//!
//! Runs once over the whole snapshot before anything is resolved. Base rules
//! cover the resolution settings; every active provider adds its own. All
//! failures are collected so a misconfigured deployment sees the complete
//! list at once.

use std::ops::Deref;
use std::sync::Arc;

use pkgfeed_domain::error::{Error, Result, ValidationFailure};
use pkgfeed_domain::value_objects::FeedConfig;

use super::provider_registry::ProviderRegistry;

/// Failures collected while validating a snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    failures: Vec<ValidationFailure>,
}

impl ValidationReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for `setting`
    pub fn fail<S: Into<String>, M: Into<String>>(&mut self, setting: S, message: M) {
        self.failures.push(ValidationFailure::new(setting, message));
    }

    /// Record a failure unless `value` is present and not blank
    pub fn require_non_empty(&mut self, setting: &str, value: Option<&str>) {
        if value.is_none_or(|v| v.trim().is_empty()) {
            self.fail(setting, "is required and must not be empty");
        }
    }

    /// Failures recorded so far
    pub fn failures(&self) -> &[ValidationFailure] {
        &self.failures
    }

    /// Whether no failure was recorded
    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    /// Convert into a batch [`Error::Validation`] when anything failed
    pub fn into_result(self) -> Result<()> {
        if self.failures.is_empty() {
            Ok(())
        } else {
            Err(Error::validation(self.failures))
        }
    }
}

/// Check a snapshot against the base rules and every active provider's rules
///
/// Pure: the snapshot is only read, and validating the same snapshot twice
/// yields the same report.
pub fn validate_snapshot(config: &FeedConfig, registry: &ProviderRegistry) -> ValidationReport {
    let mut report = ValidationReport::new();

    report.require_non_empty("database.type", Some(&config.database.kind));
    report.require_non_empty("storage.type", Some(&config.storage.kind));
    report.require_non_empty("search.type", Some(&config.search.kind));

    if config.resolution.construction_timeout_secs == Some(0) {
        report.fail(
            "resolution.construction_timeout_secs",
            "must be greater than 0 when set",
        );
    }

    let known = registry.capability_names();
    for capability in config.resolution.lifetimes.keys() {
        if !known.contains(&capability.as_str()) {
            report.fail(
                format!("resolution.lifetimes.{capability}"),
                format!("unknown capability; registered: [{}]", known.join(", ")),
            );
        }
    }

    for (_, provider) in registry.descriptors() {
        if provider.is_active(config) {
            provider.validate(config, &mut report);
        }
    }

    report
}

/// Find a dependency cycle among the providers `config` selects
///
/// For each capability the first applicable provider in registration order
/// is the one that would be built; its declared dependencies are the edges.
/// Returns the chain of capability names ending with the repeated one.
pub fn find_dependency_cycle(
    config: &FeedConfig,
    registry: &ProviderRegistry,
) -> Option<Vec<&'static str>> {
    let mut edges: Vec<(&'static str, Vec<&'static str>)> = Vec::new();
    for (capability, provider) in registry.descriptors() {
        if !edges.iter().any(|(name, _)| *name == capability) && provider.is_active(config) {
            edges.push((capability, provider.dependencies()));
        }
    }

    let mut finished = Vec::new();
    edges.iter().find_map(|(capability, _)| {
        visit(*capability, &edges, &mut Vec::new(), &mut finished)
    })
}

fn visit(
    capability: &'static str,
    edges: &[(&'static str, Vec<&'static str>)],
    path: &mut Vec<&'static str>,
    finished: &mut Vec<&'static str>,
) -> Option<Vec<&'static str>> {
    if let Some(start) = path.iter().position(|name| *name == capability) {
        let mut chain = path[start..].to_vec();
        chain.push(capability);
        return Some(chain);
    }
    if finished.contains(&capability) {
        return None;
    }

    path.push(capability);
    let dependencies = edges
        .iter()
        .find(|(name, _)| *name == capability)
        .map(|(_, deps)| deps.as_slice())
        .unwrap_or_default();
    for dependency in dependencies {
        if let Some(chain) = visit(*dependency, edges, path, finished) {
            return Some(chain);
        }
    }
    path.pop();
    finished.push(capability);
    None
}

/// A snapshot that passed validation
///
/// The only way to obtain one is [`ValidatedConfig::validate`], so holding it
/// proves validation ran and the selected providers form no dependency cycle.
/// Cloning shares the same immutable snapshot.
#[derive(Debug, Clone)]
pub struct ValidatedConfig(Arc<FeedConfig>);

impl ValidatedConfig {
    /// Validate `config` against `registry`
    ///
    /// Fails with every rule violation at once, or with
    /// [`Error::DependencyCycle`] when the selected providers depend on each
    /// other in a loop.
    pub fn validate(config: FeedConfig, registry: &ProviderRegistry) -> Result<Self> {
        validate_snapshot(&config, registry).into_result()?;
        if let Some(chain) = find_dependency_cycle(&config, registry) {
            return Err(Error::DependencyCycle { chain });
        }
        Ok(Self(Arc::new(config)))
    }
}

impl Deref for ValidatedConfig {
    type Target = FeedConfig;

    fn deref(&self) -> &FeedConfig {
        &self.0
    }
}
