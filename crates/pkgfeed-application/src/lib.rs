//! # Application Layer
//!
//! Composition of swappable backends and the use cases built on them.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`registry`] | Provider registry, resolver, lifetimes, scopes, validation |
//! | [`use_cases`] | Package indexing over injected capabilities |

pub mod registry;
pub mod use_cases;

// Re-export async_trait so provider crates share one version
pub use async_trait::async_trait;
