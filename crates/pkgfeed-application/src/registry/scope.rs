//! Lifetime Manager - resolution root and scopes
//!
//! ```text
//! ServiceRoot (validated snapshot, registry, singleton cache)
//!   ├── Scope A (request) ── scoped cache
//!   └── Scope B (request) ── scoped cache
//! ```
//!
//! A [`ServiceRoot`] exists only for a snapshot that passed validation. Each
//! unit of work opens a [`Scope`] and asks it for capabilities:
//!
//! | Lifetime | Cached in | Built |
//! |----------|-----------|-------|
//! | singleton | root | once per root |
//! | scoped | scope | once per scope |
//! | transient | nowhere | on every `get` |
//!
//! First construction of a cached instance runs behind an async once-cell:
//! concurrent callers wait for the in-flight build instead of racing it.
//! Failed, timed-out and cancelled builds leave the cell empty so the next
//! caller retries from scratch.
//!
//! A build only waits on the capabilities its provider declares, and the root
//! refuses snapshots whose selected providers depend on each other in a loop,
//! so waits on in-flight builds always end.

use std::any::{Any, TypeId};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use pkgfeed_domain::error::{Error, Result};
use pkgfeed_domain::value_objects::{FeedConfig, Lifetime};
use tokio::sync::OnceCell;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};
use uuid::Uuid;

use super::capability::Capability;
use super::lifetime::LifetimePolicy;
use super::provider::ServiceOf;
use super::provider_registry::ProviderRegistry;
use super::resolver::CapabilityResolver;
use super::validation::ValidatedConfig;

// Arc<C::Service> for the capability keyed by TypeId
type ErasedInstance = Box<dyn Any + Send + Sync>;

#[derive(Default)]
struct InstanceCache {
    cells: DashMap<TypeId, Arc<OnceCell<ErasedInstance>>>,
}

impl InstanceCache {
    async fn get_or_build<C, F, Fut>(&self, build: F) -> Result<Arc<ServiceOf<C>>>
    where
        C: Capability,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Arc<ServiceOf<C>>>>,
    {
        let cell = Arc::clone(self.cells.entry(TypeId::of::<C>()).or_default().value());

        let instance = cell
            .get_or_try_init(|| async {
                build()
                    .await
                    .map(|service| Box::new(service) as ErasedInstance)
            })
            .await?;

        instance
            .downcast_ref::<Arc<ServiceOf<C>>>()
            .cloned()
            .ok_or_else(|| Error::internal(format!("Cached instance type mismatch for '{}'", C::NAME)))
    }

    fn len(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.value().initialized())
            .count()
    }
}

/// Resolution context for one configuration snapshot
pub struct ServiceRoot {
    config: ValidatedConfig,
    registry: Arc<ProviderRegistry>,
    resolver: CapabilityResolver,
    lifetimes: LifetimePolicy,
    construction_timeout: Option<Duration>,
    singletons: InstanceCache,
}

impl ServiceRoot {
    /// Validate `config` and create a resolution context over `registry`
    ///
    /// Nothing is resolved here. A snapshot that fails validation, or whose
    /// selected providers form a dependency cycle, never yields a root.
    pub fn new(config: FeedConfig, registry: Arc<ProviderRegistry>) -> Result<Arc<Self>> {
        let config = ValidatedConfig::validate(config, &registry).inspect_err(|err| {
            for failure in err.validation_failures() {
                error!(setting = %failure.setting, "Invalid configuration: {}", failure.message);
            }
            if let Error::DependencyCycle { chain } = err {
                error!(chain = ?chain, "Selected providers depend on each other");
            }
        })?;

        let resolver = CapabilityResolver::new(config.resolution.mode);
        let lifetimes = LifetimePolicy::from_config(&config);
        let construction_timeout = config
            .resolution
            .construction_timeout_secs
            .map(Duration::from_secs);

        info!(
            mode = ?resolver.mode(),
            timeout = ?construction_timeout,
            capabilities = ?registry.capability_names(),
            "Resolution context ready"
        );

        Ok(Arc::new(Self {
            config,
            registry,
            resolver,
            lifetimes,
            construction_timeout,
            singletons: InstanceCache::default(),
        }))
    }

    /// The validated snapshot
    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// The provider registry
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// The resolver used by every scope of this root
    pub fn resolver(&self) -> CapabilityResolver {
        self.resolver
    }

    /// Effective lifetime of `C`
    pub fn lifetime_of<C: Capability>(&self) -> Lifetime {
        self.lifetimes.lifetime_of::<C>()
    }

    /// Name of the provider that would serve `C`, without building it
    pub fn selected_provider<C: Capability>(&self) -> Result<&'static str> {
        self.resolver
            .select::<C>(&self.registry, &self.config)
            .map(|provider| provider.name())
    }

    /// Number of singleton instances built so far
    pub fn singleton_count(&self) -> usize {
        self.singletons.len()
    }

    /// Open a new scope (one per unit of work)
    pub fn create_scope(self: &Arc<Self>) -> Scope {
        let scope = Scope::detached(self, CancellationToken::new());
        debug!(scope = %scope.id, "Scope opened");
        scope
    }
}

impl fmt::Debug for ServiceRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceRoot")
            .field("mode", &self.resolver.mode())
            .field("registry", &self.registry)
            .field("singletons", &self.singletons.len())
            .finish_non_exhaustive()
    }
}

/// A unit-of-work boundary owning scoped instances
pub struct Scope {
    id: Uuid,
    root: Arc<ServiceRoot>,
    instances: InstanceCache,
    cancellation: CancellationToken,
}

impl Scope {
    fn detached(root: &Arc<ServiceRoot>, cancellation: CancellationToken) -> Self {
        Self {
            id: Uuid::new_v4(),
            root: Arc::clone(root),
            instances: InstanceCache::default(),
            cancellation,
        }
    }

    /// Tie constructions in this scope to `token`
    ///
    /// Once the token is cancelled, pending and future constructions fail with
    /// [`Error::Cancelled`]; already-built instances stay usable.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Scope identifier, for logs
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Resolution context this scope belongs to
    pub fn root(&self) -> &Arc<ServiceRoot> {
        &self.root
    }

    /// Snapshot the scope resolves against
    pub fn config(&self) -> &FeedConfig {
        self.root.config()
    }

    /// Cancellation token of this scope
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Number of scoped instances built so far
    pub fn cached_count(&self) -> usize {
        self.instances.len()
    }

    /// Get the active implementation of `C`
    ///
    /// # Errors
    /// * [`Error::NoProvider`] / [`Error::AmbiguousProvider`] - selection failed
    /// * [`Error::Construction`] - the selected factory failed
    /// * [`Error::Cancelled`] / [`Error::Timeout`] - construction interrupted
    /// * [`Error::UndeclaredDependency`] - a factory asked for a capability it
    ///   did not declare
    pub async fn get<C: Capability>(&self) -> Result<Arc<ServiceOf<C>>> {
        match self.root.lifetime_of::<C>() {
            Lifetime::Transient => self.construct::<C>().await,
            Lifetime::Scoped => {
                self.instances
                    .get_or_build::<C, _, _>(|| self.construct::<C>())
                    .await
            }
            Lifetime::Singleton => {
                // Dependencies of a singleton come from a throwaway scope so
                // nothing scoped to this unit of work is captured.
                self.root
                    .singletons
                    .get_or_build::<C, _, _>(|| async {
                        let detached = Scope::detached(&self.root, self.cancellation.clone());
                        detached.construct::<C>().await
                    })
                    .await
            }
        }
    }

    async fn construct<C: Capability>(&self) -> Result<Arc<ServiceOf<C>>> {
        let root = &self.root;
        let build = root.resolver.resolve::<C>(&root.registry, self);
        let bounded = async {
            match root.construction_timeout {
                Some(limit) => tokio::time::timeout(limit, build)
                    .await
                    .unwrap_or_else(|_| Err(Error::timeout(C::NAME, limit))),
                None => build.await,
            }
        };

        let result = tokio::select! {
            biased;
            () = self.cancellation.cancelled() => Err(Error::cancelled(C::NAME)),
            result = bounded => result,
        };

        match &result {
            Ok(_) => debug!(scope = %self.id, capability = C::NAME, "Constructed instance"),
            Err(err) => warn!(scope = %self.id, capability = C::NAME, error = %err, "Construction failed"),
        }
        result
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        trace!(scope = %self.id, instances = self.instances.len(), "Scope closed");
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("id", &self.id)
            .field("instances", &self.instances.len())
            .field("cancelled", &self.cancellation.is_cancelled())
            .finish()
    }
}

/// What a provider factory may use while building
///
/// Gives access to the validated snapshot and to the capabilities the
/// provider declared, resolved in the same scope as the instance being built.
pub struct Dependencies<'a> {
    scope: &'a Scope,
    capability: &'static str,
    provider: &'static str,
    declared: Vec<&'static str>,
}

impl<'a> Dependencies<'a> {
    pub(crate) fn new(
        scope: &'a Scope,
        capability: &'static str,
        provider: &'static str,
        declared: Vec<&'static str>,
    ) -> Self {
        Self {
            scope,
            capability,
            provider,
            declared,
        }
    }

    /// The validated snapshot
    pub fn config(&self) -> &FeedConfig {
        self.scope.config()
    }

    /// Resolve a capability this provider declared as a dependency
    ///
    /// # Errors
    /// * [`Error::UndeclaredDependency`] - `D` is missing from the provider's
    ///   [`dependencies`](super::CapabilityProvider::dependencies)
    pub async fn get<D: Capability>(&self) -> Result<Arc<ServiceOf<D>>> {
        if !self.declared.contains(&D::NAME) {
            return Err(Error::UndeclaredDependency {
                capability: self.capability,
                provider: self.provider,
                dependency: D::NAME,
            });
        }
        self.scope.get::<D>().await
    }
}
