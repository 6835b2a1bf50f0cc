//! Lifetime policy
//!
//! Decides, per capability, whether a resolved instance is shared by the
//! whole resolution context, by one scope, or rebuilt on every request.
//! Defaults come from [`Capability::DEFAULT_LIFETIME`]; the snapshot's
//! `resolution.lifetimes` table overrides them by capability name.

use std::collections::BTreeMap;

use pkgfeed_domain::value_objects::{FeedConfig, Lifetime};

use super::capability::Capability;

/// Per-capability lifetime overrides
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LifetimePolicy {
    overrides: BTreeMap<String, Lifetime>,
}

impl LifetimePolicy {
    /// Policy with no overrides
    pub fn new() -> Self {
        Self::default()
    }

    /// Policy carrying the snapshot's overrides
    pub fn from_config(config: &FeedConfig) -> Self {
        Self {
            overrides: config.resolution.lifetimes.clone(),
        }
    }

    /// Override the lifetime of the capability named `capability`
    pub fn with_override<S: Into<String>>(mut self, capability: S, lifetime: Lifetime) -> Self {
        self.overrides.insert(capability.into(), lifetime);
        self
    }

    /// Effective lifetime of `C`
    pub fn lifetime_of<C: Capability>(&self) -> Lifetime {
        self.overrides
            .get(C::NAME)
            .copied()
            .unwrap_or(C::DEFAULT_LIFETIME)
    }
}
