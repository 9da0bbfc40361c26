//! # Resolver
//!
//! Minimum-ancestor-distance handler resolution over an immutable registry.
//!
//! ## Overview
//!
//! Given a failure's concrete category, the resolver materializes the
//! ancestor chain from that category up to the root and selects, among the
//! registered entries on the chain, the one with minimum ancestor distance.
//! The chain is a total order with at most one registry entry per category,
//! so the minimum is always unique. The candidate set cannot be empty for a
//! well-formed taxonomy because the registry guarantees a root entry; an
//! empty set therefore signals a structural fault and is surfaced loudly.
//!
//! Resolution is read-only and allocates only the transient chain, so it may
//! run concurrently from any number of callers.

use crate::error::{DispatchError, Result};
use crate::handler::FailureHandler;
use crate::registry::handler_registry::{HandlerRegistry, RegistryEntry};
use crate::taxonomy::{FailureCategory, FailureTaxonomy};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error};

/// Outcome of resolving a concrete category against the registry
pub struct Resolution<'a> {
    entry: &'a RegistryEntry,
    distance: usize,
}

impl<'a> Resolution<'a> {
    /// The winning registry entry
    pub fn entry(&self) -> &'a RegistryEntry {
        self.entry
    }

    /// The category the winning entry is bound to
    pub fn category(&self) -> &'a FailureCategory {
        self.entry.category()
    }

    /// The winning handler
    pub fn handler(&self) -> &'a Arc<dyn FailureHandler> {
        self.entry.handler()
    }

    /// Parent hops from the concrete category to the winning entry's category
    pub fn distance(&self) -> usize {
        self.distance
    }
}

impl fmt::Debug for Resolution<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolution")
            .field("category", self.entry.category())
            .field("handler", &self.entry.handler().name())
            .field("distance", &self.distance)
            .finish()
    }
}

/// Resolves concrete failure categories to their most specific handler
pub struct Resolver<'a> {
    taxonomy: &'a FailureTaxonomy,
    registry: &'a HandlerRegistry,
}

impl<'a> Resolver<'a> {
    /// Create a resolver over a taxonomy and a built registry
    pub fn new(taxonomy: &'a FailureTaxonomy, registry: &'a HandlerRegistry) -> Self {
        Self { taxonomy, registry }
    }

    /// Resolve the most specific registered handler for a concrete category.
    ///
    /// Fails with [`DispatchError::NoHandler`] when no candidate exists, i.e.
    /// the category is outside the taxonomy or its chain somehow escaped the
    /// root entry. That is an internal-consistency fault, never silently
    /// defaulted.
    pub fn resolve(&self, concrete: &FailureCategory) -> Result<Resolution<'a>> {
        // The chain is ordered leaf to root, so the enumeration index is the
        // ancestor distance of each candidate.
        let chain = self.taxonomy.ancestor_chain(concrete);

        let winner = chain
            .into_iter()
            .flatten()
            .enumerate()
            .filter_map(|(distance, category)| {
                self.registry.get(category).map(|entry| (distance, entry))
            })
            .min_by_key(|(distance, _entry)| *distance);

        match winner {
            Some((distance, entry)) => {
                debug!(
                    concrete = %concrete,
                    matched = %entry.category(),
                    distance,
                    handler = entry.handler().name(),
                    "Resolved failure handler"
                );
                Ok(Resolution { entry, distance })
            }
            None => {
                error!(
                    concrete = %concrete,
                    "No entry resolved for failure category, root entry included"
                );
                Err(DispatchError::no_handler(concrete.as_str()))
            }
        }
    }
}
