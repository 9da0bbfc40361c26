//! # Dispatcher Factory
//!
//! Factory pattern for creating and caching dispatch facades from named
//! registration groups.
//!
//! ## Overview
//!
//! Applications often assemble handlers from several sources (one list per
//! subsystem, per crate, per wiring module). The factory stores each source
//! as a named, ordered registration group and builds facades from a selection
//! of groups, caching the result so repeated selections reuse the same
//! facade. Replacing a group invalidates every cached facade built from it.
//!
//! ## Usage
//!
//! ```rust
//! use failure_dispatch::factory::DispatcherFactory;
//! use failure_dispatch::handler::{HandlerRegistration, HandlingResult};
//! use failure_dispatch::taxonomy::FailureTaxonomy;
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let taxonomy = Arc::new(
//!     FailureTaxonomy::new("failure").with_category("storage_failure", "failure")?,
//! );
//! let factory = DispatcherFactory::new(taxonomy);
//!
//! factory.add_group(
//!     "storage",
//!     vec![HandlerRegistration::from_fn("storage_failure", |_failure| {
//!         HandlingResult::just_status(503)
//!     })],
//! );
//!
//! let dispatcher = factory.create_dispatcher(&["storage"])?;
//! # let _ = dispatcher;
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

use crate::config::DispatchConfig;
use crate::dispatcher::FailureDispatcher;
use crate::error::{DispatchError, Result};
use crate::handler::HandlerRegistration;
use crate::taxonomy::FailureTaxonomy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Factory for building and caching failure dispatchers
pub struct DispatcherFactory {
    taxonomy: Arc<FailureTaxonomy>,
    config: DispatchConfig,
    /// Named registration groups, each ordered as supplied
    groups: RwLock<HashMap<String, Vec<HandlerRegistration>>>,
    /// Cache of built dispatchers keyed by group selection
    dispatcher_cache: RwLock<HashMap<String, Arc<FailureDispatcher>>>,
}

impl DispatcherFactory {
    /// Create a factory with the default dispatch configuration
    pub fn new(taxonomy: Arc<FailureTaxonomy>) -> Self {
        Self::with_config(taxonomy, DispatchConfig::default())
    }

    /// Create a factory with an explicit dispatch configuration
    pub fn with_config(taxonomy: Arc<FailureTaxonomy>, config: DispatchConfig) -> Self {
        Self {
            taxonomy,
            config,
            groups: RwLock::new(HashMap::new()),
            dispatcher_cache: RwLock::new(HashMap::new()),
        }
    }

    /// Store a named registration group.
    ///
    /// Re-adding an existing name replaces the group and evicts every cached
    /// dispatcher that was built from it.
    pub fn add_group(&self, name: &str, registrations: Vec<HandlerRegistration>) {
        let replaced = {
            let mut groups = self.groups.write();
            groups.insert(name.to_string(), registrations).is_some()
        };

        if replaced {
            let mut cache = self.dispatcher_cache.write();
            cache.retain(|key, _dispatcher| !key.split('+').any(|group| group == name));
        }

        info!(group = name, replaced, "Registered handler group");
    }

    /// Build a dispatcher from the named groups, concatenated in the order
    /// given, reusing a cached facade for a repeated selection.
    pub fn create_dispatcher(&self, group_names: &[&str]) -> Result<Arc<FailureDispatcher>> {
        let cache_key = group_names.join("+");

        // Check cache first
        {
            let cache = self.dispatcher_cache.read();
            if let Some(dispatcher) = cache.get(&cache_key) {
                debug!(key = %cache_key, "Returning cached dispatcher");
                return Ok(dispatcher.clone());
            }
        }

        // Gather registrations while holding the group lock only
        let registrations = {
            let groups = self.groups.read();
            let mut registrations = Vec::new();
            for name in group_names {
                let group = groups
                    .get(*name)
                    .ok_or_else(|| DispatchError::unknown_group(*name))?;
                registrations.extend(group.iter().cloned());
            }
            registrations
        };

        let dispatcher = Arc::new(FailureDispatcher::with_config(
            self.taxonomy.clone(),
            registrations,
            self.config.clone(),
        )?);

        {
            let mut cache = self.dispatcher_cache.write();
            cache.insert(cache_key.clone(), dispatcher.clone());
        }

        info!(key = %cache_key, "Created and cached new dispatcher");
        Ok(dispatcher)
    }

    /// Clear the dispatcher cache
    pub fn clear_cache(&self) {
        let mut cache = self.dispatcher_cache.write();
        cache.clear();
        info!("Dispatcher cache cleared");
    }

    /// Get cache statistics
    pub fn cache_stats(&self) -> FactoryCacheStats {
        let cache = self.dispatcher_cache.read();
        let groups = self.groups.read();
        FactoryCacheStats {
            cached_dispatchers: cache.len(),
            cache_keys: cache.keys().cloned().collect(),
            registered_groups: groups.len(),
        }
    }
}

/// Statistics about the dispatcher cache
#[derive(Debug, Clone)]
pub struct FactoryCacheStats {
    pub cached_dispatchers: usize,
    pub cache_keys: Vec<String>,
    pub registered_groups: usize,
}
