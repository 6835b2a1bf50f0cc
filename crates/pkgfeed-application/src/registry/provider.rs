//! Capability provider contract
//!
//! A provider is one candidate implementation of a capability plus the
//! condition under which it applies. Providers are registered once at startup
//! and stay cheap: nothing is allocated or opened until [`build`] runs for the
//! provider that was actually selected.
//!
//! [`build`]: CapabilityProvider::build

use std::sync::Arc;

use async_trait::async_trait;
use pkgfeed_domain::error::Result;
use pkgfeed_domain::value_objects::FeedConfig;

use super::capability::Capability;
use super::scope::Dependencies;
use super::validation::ValidationReport;

/// Service type produced by providers of `C`
pub type ServiceOf<C> = <C as Capability>::Service;

/// One candidate implementation of a capability
///
/// # Example
///
/// ```ignore
/// struct MemoryStorageProvider;
///
/// #[async_trait]
/// impl CapabilityProvider for MemoryStorageProvider {
///     type Capability = StorageCapability;
///
///     fn name(&self) -> &'static str { "memory" }
///     fn description(&self) -> &'static str { "In-process blob storage" }
///
///     fn is_active(&self, config: &FeedConfig) -> bool {
///         config.storage.is_type("memory")
///     }
///
///     async fn build(&self, _deps: &Dependencies<'_>) -> Result<Arc<dyn StorageService>> {
///         Ok(Arc::new(MemoryStorageService::default()))
///     }
/// }
/// ```
#[async_trait]
pub trait CapabilityProvider: Send + Sync + 'static {
    /// Capability this provider implements
    type Capability: Capability;

    /// Unique name within the capability (e.g. "file", "memory")
    fn name(&self) -> &'static str;

    /// Human-readable description for listings
    fn description(&self) -> &'static str;

    /// Whether the snapshot selects this provider
    ///
    /// Must depend on `config` alone and have no side effects.
    fn is_active(&self, config: &FeedConfig) -> bool;

    /// Names of the capabilities `build` requests through [`Dependencies::get`]
    ///
    /// Requests for anything not listed here fail. Cycles among the selected
    /// providers are rejected when the resolution root is created.
    fn dependencies(&self) -> Vec<&'static str> {
        Vec::new()
    }

    /// Contribute validation rules; only called when the provider is active
    fn validate(&self, _config: &FeedConfig, _report: &mut ValidationReport) {}

    /// Build the implementation
    ///
    /// May perform I/O. Declared dependencies are requested through `deps`
    /// and resolved in the caller's scope.
    async fn build(&self, deps: &Dependencies<'_>) -> Result<Arc<ServiceOf<Self::Capability>>>;
}
