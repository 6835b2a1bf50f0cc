//! Backend selection diagnostics
//!
//! Reports which provider would serve each capability under the current
//! snapshot, without building anything.

use std::fmt;

use pkgfeed_application::registry::{
    Capability, ContextCapability, DatabaseCapability, SearchCapability, SearchIndexerCapability,
    ServiceRoot, StorageCapability,
};
use pkgfeed_domain::value_objects::Lifetime;

/// Selection outcome for one capability
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionEntry {
    /// Capability name
    pub capability: &'static str,
    /// Effective lifetime
    pub lifetime: Lifetime,
    /// Selected provider, or why none could be selected
    pub provider: Result<&'static str, String>,
}

/// Selection outcome for every capability
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionReport {
    /// One entry per capability
    pub entries: Vec<SelectionEntry>,
}

impl SelectionReport {
    /// Whether every capability has a provider
    pub fn is_healthy(&self) -> bool {
        self.entries.iter().all(|e| e.provider.is_ok())
    }

    /// Entry for the capability named `capability`
    pub fn entry(&self, capability: &str) -> Option<&SelectionEntry> {
        self.entries.iter().find(|e| e.capability == capability)
    }
}

fn entry<C: Capability>(root: &ServiceRoot) -> SelectionEntry {
    SelectionEntry {
        capability: C::NAME,
        lifetime: root.lifetime_of::<C>(),
        provider: root.selected_provider::<C>().map_err(|e| e.to_string()),
    }
}

/// Report the provider selected for each capability of `root`
pub fn diagnose(root: &ServiceRoot) -> SelectionReport {
    SelectionReport {
        entries: vec![
            entry::<ContextCapability>(root),
            entry::<DatabaseCapability>(root),
            entry::<StorageCapability>(root),
            entry::<SearchCapability>(root),
            entry::<SearchIndexerCapability>(root),
        ],
    }
}

impl fmt::Display for SelectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            match &entry.provider {
                Ok(provider) => writeln!(
                    f,
                    "{:<16} {:<10} {}",
                    entry.capability, entry.lifetime, provider
                )?,
                Err(reason) => writeln!(
                    f,
                    "{:<16} {:<10} ERROR: {}",
                    entry.capability, entry.lifetime, reason
                )?,
            }
        }
        Ok(())
    }
}
