//! Capability Resolver
//!
//! Picks the active provider of a capability and builds its implementation.
//!
//! ```text
//! providers_for::<C>()  →  [P0, P1, P2]      (registration order)
//!                            │   │   │
//! is_active(config)     →    ✗   ✓   ✓
//!                                │
//! first match           →        P1 ── build(deps) ──▶ Arc<C::Service>
//! ```
//!
//! Every predicate is evaluated (they are pure) so shadowed providers can be
//! reported; only the selected provider's factory ever runs.

use std::sync::Arc;

use pkgfeed_domain::error::{Error, Result};
use pkgfeed_domain::value_objects::{FeedConfig, SelectionMode};
use tracing::{debug, warn};

use super::capability::Capability;
use super::provider::ServiceOf;
use super::provider_registry::{DynProvider, ProviderRegistry};
use super::scope::{Dependencies, Scope};

/// Selects and builds the active provider for a capability
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CapabilityResolver {
    mode: SelectionMode,
}

impl CapabilityResolver {
    /// Create a resolver with the given tie-break policy
    pub fn new(mode: SelectionMode) -> Self {
        Self { mode }
    }

    /// Tie-break policy in use
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Pick the provider of `C` that applies to `config`
    ///
    /// # Errors
    /// * [`Error::NoProvider`] - no registered provider applies
    /// * [`Error::AmbiguousProvider`] - several apply and the mode is strict
    pub fn select<'r, C: Capability>(
        &self,
        registry: &'r ProviderRegistry,
        config: &FeedConfig,
    ) -> Result<&'r DynProvider<C>> {
        let providers = registry.providers_for::<C>();
        let mut applicable = providers.iter().filter(|p| p.is_active(config));

        let Some(selected) = applicable.next() else {
            let considered = providers.iter().map(|p| p.name()).collect();
            return Err(Error::no_provider(C::NAME, considered));
        };

        let shadowed: Vec<&'static str> = applicable.map(|p| p.name()).collect();
        if !shadowed.is_empty() {
            match self.mode {
                SelectionMode::Strict => {
                    let mut candidates = vec![selected.name()];
                    candidates.extend(shadowed);
                    return Err(Error::ambiguous_provider(C::NAME, candidates));
                }
                SelectionMode::FirstMatch => warn!(
                    capability = C::NAME,
                    selected = selected.name(),
                    shadowed = ?shadowed,
                    "Several providers apply; the first registered one wins"
                ),
            }
        }

        debug!(capability = C::NAME, provider = selected.name(), "Selected provider");
        Ok(selected)
    }

    /// Select the provider of `C` and build its implementation in `scope`
    ///
    /// The factory may only request the capabilities the provider declares.
    /// Factory failures are wrapped in [`Error::Construction`].
    pub async fn resolve<C: Capability>(
        &self,
        registry: &ProviderRegistry,
        scope: &Scope,
    ) -> Result<Arc<ServiceOf<C>>> {
        let provider = self.select::<C>(registry, scope.config())?;
        let deps = Dependencies::new(scope, C::NAME, provider.name(), provider.dependencies());
        provider
            .build(&deps)
            .await
            .map_err(|source| Error::construction(C::NAME, provider.name(), source))
    }
}
