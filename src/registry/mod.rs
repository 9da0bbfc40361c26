//! # Registry Infrastructure
//!
//! The immutable handler registry and the resolver that answers lookups
//! against it.
//!
//! ## Overview
//!
//! The registry module owns the build-time half of the engine: an ordered
//! list of handler registrations is deduplicated, validated against the
//! failure taxonomy, completed with the guaranteed root entry, and frozen
//! into a [`HandlerRegistry`]. The request-time half is the [`Resolver`],
//! which walks a failure's ancestor chain and selects the registered entry
//! with minimum ancestor distance.
//!
//! ## Architecture
//!
//! ```text
//! Registry Infrastructure
//! ├── HandlerRegistry   (build: dedup, binding validation, root default)
//! └── Resolver          (dispatch: minimum-distance ancestor resolution)
//! ```

pub mod handler_registry;
pub mod resolver;

// Re-export main types for easy access
pub use handler_registry::{HandlerRegistry, RegistryEntry, RegistryStats};
pub use resolver::{Resolution, Resolver};
