//! Provider Registry
//!
//! Ordered collection of capability providers. Registration order is priority
//! order: when several providers apply, the earliest registered one is
//! selected. The registry owns providers, never the instances they build.
//!
//! Registration happens once during startup. The first resolution seals the
//! registry; any later `register` call fails with
//! [`Error::RegistrationClosed`].

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use pkgfeed_domain::error::{Error, Result};
use pkgfeed_domain::value_objects::FeedConfig;
use tracing::debug;

use super::capability::Capability;
use super::provider::CapabilityProvider;
use super::validation::ValidationReport;

/// Shared handle to a provider of `C`
pub type DynProvider<C> = Arc<dyn CapabilityProvider<Capability = C>>;

/// Capability-agnostic view of a provider, used by validation and listings
pub(crate) trait ProviderDescriptor: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn is_active(&self, config: &FeedConfig) -> bool;
    fn dependencies(&self) -> Vec<&'static str>;
    fn validate(&self, config: &FeedConfig, report: &mut ValidationReport);
}

struct ErasedProvider<C: Capability>(DynProvider<C>);

impl<C: Capability> ProviderDescriptor for ErasedProvider<C> {
    fn name(&self) -> &'static str {
        self.0.name()
    }

    fn description(&self) -> &'static str {
        self.0.description()
    }

    fn is_active(&self, config: &FeedConfig) -> bool {
        self.0.is_active(config)
    }

    fn dependencies(&self) -> Vec<&'static str> {
        self.0.dependencies()
    }

    fn validate(&self, config: &FeedConfig, report: &mut ValidationReport) {
        self.0.validate(config, report);
    }
}

struct CapabilitySlot {
    type_id: TypeId,
    name: &'static str,
    // Vec<DynProvider<C>> for the slot's capability
    providers: Box<dyn Any + Send + Sync>,
    descriptors: Vec<Arc<dyn ProviderDescriptor>>,
}

/// A registered provider, as shown in listings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderListing {
    /// Provider name
    pub name: &'static str,
    /// Provider description
    pub description: &'static str,
}

/// Providers of one capability, in priority order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityListing {
    /// Capability name
    pub capability: &'static str,
    /// Registered providers, highest priority first
    pub providers: Vec<ProviderListing>,
}

/// Ordered providers per capability
#[derive(Default)]
pub struct ProviderRegistry {
    slots: Vec<CapabilitySlot>,
    sealed: AtomicBool,
}

impl ProviderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider to its capability's list
    ///
    /// Fails if resolution has already started or if the capability already
    /// has a provider with the same name.
    pub fn register<P: CapabilityProvider>(&mut self, provider: P) -> Result<&mut Self> {
        let capability = <P::Capability as Capability>::NAME;
        if self.is_sealed() {
            return Err(Error::RegistrationClosed { capability });
        }

        let provider: DynProvider<P::Capability> = Arc::new(provider);
        let name = provider.name();
        let slot = self.slot_mut::<P::Capability>();

        if slot.descriptors.iter().any(|d| d.name() == name) {
            return Err(Error::configuration(format!(
                "Provider '{name}' is already registered for capability '{capability}'"
            )));
        }

        let list = slot
            .providers
            .downcast_mut::<Vec<DynProvider<P::Capability>>>()
            .ok_or_else(|| Error::internal(format!("Provider list type mismatch for '{capability}'")))?;
        list.push(Arc::clone(&provider));
        let priority = list.len() - 1;
        slot.descriptors.push(Arc::new(ErasedProvider(provider)));

        debug!(capability, provider = name, priority, "Registered provider");
        Ok(self)
    }

    /// Providers of `C` in registration order
    ///
    /// Seals the registry: this is the entry point of every resolution.
    pub fn providers_for<C: Capability>(&self) -> &[DynProvider<C>] {
        self.sealed.store(true, Ordering::Release);
        self.slot::<C>()
            .and_then(|slot| slot.providers.downcast_ref::<Vec<DynProvider<C>>>())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Names of the providers registered for `C`, in order
    pub fn provider_names<C: Capability>(&self) -> Vec<&'static str> {
        self.slot::<C>()
            .map(|slot| slot.descriptors.iter().map(|d| d.name()).collect())
            .unwrap_or_default()
    }

    /// Whether resolution has started
    pub fn is_sealed(&self) -> bool {
        self.sealed.load(Ordering::Acquire)
    }

    /// Names of every capability with at least one provider
    pub fn capability_names(&self) -> Vec<&'static str> {
        self.slots.iter().map(|slot| slot.name).collect()
    }

    /// Capabilities and their providers, in registration order
    pub fn describe(&self) -> Vec<CapabilityListing> {
        self.slots
            .iter()
            .map(|slot| CapabilityListing {
                capability: slot.name,
                providers: slot
                    .descriptors
                    .iter()
                    .map(|d| ProviderListing {
                        name: d.name(),
                        description: d.description(),
                    })
                    .collect(),
            })
            .collect()
    }

    pub(crate) fn descriptors(
        &self,
    ) -> impl Iterator<Item = (&'static str, &dyn ProviderDescriptor)> + '_ {
        self.slots.iter().flat_map(|slot| {
            slot.descriptors
                .iter()
                .map(move |d| (slot.name, d.as_ref()))
        })
    }

    fn slot<C: Capability>(&self) -> Option<&CapabilitySlot> {
        let type_id = TypeId::of::<C>();
        self.slots.iter().find(|slot| slot.type_id == type_id)
    }

    fn slot_mut<C: Capability>(&mut self) -> &mut CapabilitySlot {
        let type_id = TypeId::of::<C>();
        let index = match self.slots.iter().position(|slot| slot.type_id == type_id) {
            Some(index) => index,
            None => {
                self.slots.push(CapabilitySlot {
                    type_id,
                    name: C::NAME,
                    providers: Box::new(Vec::<DynProvider<C>>::new()),
                    descriptors: Vec::new(),
                });
                self.slots.len() - 1
            }
        };
        &mut self.slots[index]
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for slot in &self.slots {
            let names: Vec<_> = slot.descriptors.iter().map(|d| d.name()).collect();
            map.entry(&slot.name, &names);
        }
        map.finish()
    }
}

impl fmt::Display for CapabilityListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.capability)?;
        for provider in &self.providers {
            writeln!(f, "  - {}: {}", provider.name, provider.description)?;
        }
        Ok(())
    }
}
