//! Pluggable backend resolution
//!
//! ```text
//! FeedConfig ──validate──▶ ServiceRoot ──create_scope──▶ Scope
//!                              │                           │ get::<C>()
//!                              ▼                           ▼
//!                       ProviderRegistry ──▶ CapabilityResolver ──▶ provider.build()
//! ```
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`capability`] | Capability marker types and their ports |
//! | [`provider`] | The `CapabilityProvider` contract |
//! | [`provider_registry`] | Ordered providers per capability |
//! | [`resolver`] | First-match (or strict) selection and construction |
//! | [`lifetime`] | Singleton / scoped / transient policy |
//! | [`scope`] | Resolution root, scopes and instance caching |
//! | [`validation`] | Batch validation of the configuration snapshot |

pub mod capability;
pub mod lifetime;
pub mod provider;
pub mod provider_registry;
pub mod resolver;
pub mod scope;
pub mod validation;

pub use capability::{
    Capability, ContextCapability, DatabaseCapability, SearchCapability, SearchIndexerCapability,
    StorageCapability,
};
pub use lifetime::LifetimePolicy;
pub use provider::{CapabilityProvider, ServiceOf};
pub use provider_registry::{CapabilityListing, DynProvider, ProviderListing, ProviderRegistry};
pub use resolver::CapabilityResolver;
pub use scope::{Dependencies, Scope, ServiceRoot};
pub use validation::{
    ValidatedConfig, ValidationReport, find_dependency_cycle, validate_snapshot,
};
