//! # Handler Registry
//!
//! Immutable registry mapping each failure category to the single handler
//! bound to it.
//!
//! ## Overview
//!
//! The registry is built once from an ordered list of registrations and never
//! mutated afterwards. Building enforces the two structural invariants every
//! registry satisfies:
//!
//! - **Uniqueness**: at most one entry per category. When several handlers
//!   are bound to the same category, the first in input order wins and the
//!   rest are discarded with a warning; this is a degraded-but-defined
//!   outcome, not an error.
//! - **Root presence**: exactly one entry is bound to the root category. If
//!   none was supplied, a default handler returning a fixed status code is
//!   synthesized.
//!
//! A registration bound to a category the taxonomy does not contain cannot be
//! situated in the hierarchy and fails the whole build.
//!
//! ## Usage
//!
//! ```rust
//! use failure_dispatch::config::DispatchConfig;
//! use failure_dispatch::handler::{HandlerRegistration, HandlingResult};
//! use failure_dispatch::registry::HandlerRegistry;
//! use failure_dispatch::taxonomy::FailureTaxonomy;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let taxonomy = FailureTaxonomy::new("failure")
//!     .with_category("runtime_failure", "failure")?;
//!
//! let registrations = vec![HandlerRegistration::from_fn("runtime_failure", |_failure| {
//!     HandlingResult::just_status(500)
//! })];
//!
//! let registry = HandlerRegistry::build(&taxonomy, registrations, &DispatchConfig::default())?;
//! assert_eq!(registry.len(), 2); // supplied handler + synthesized root entry
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

use crate::config::DispatchConfig;
use crate::error::{DispatchError, Result};
use crate::handler::{Failure, FailureHandler, HandlerRegistration, HandlingResult};
use crate::taxonomy::{FailureCategory, FailureTaxonomy};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Handler synthesized for the root category when none was supplied
struct DefaultRootHandler {
    status_code: u16,
}

impl FailureHandler for DefaultRootHandler {
    fn handle(&self, _failure: &dyn Failure) -> HandlingResult {
        HandlingResult::just_status(self.status_code)
    }

    fn name(&self) -> &str {
        "default_root_handler"
    }
}

/// A single (category, handler) registry entry
#[derive(Clone)]
pub struct RegistryEntry {
    category: FailureCategory,
    handler: Arc<dyn FailureHandler>,
    registered_at: DateTime<Utc>,
}

impl RegistryEntry {
    fn new(category: FailureCategory, handler: Arc<dyn FailureHandler>) -> Self {
        Self {
            category,
            handler,
            registered_at: Utc::now(),
        }
    }

    /// The category this entry is bound to
    pub fn category(&self) -> &FailureCategory {
        &self.category
    }

    /// The handler held by this entry
    pub fn handler(&self) -> &Arc<dyn FailureHandler> {
        &self.handler
    }

    /// When this entry was created during the build
    pub fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }
}

impl fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("category", &self.category)
            .field("handler", &self.handler.name())
            .field("registered_at", &self.registered_at)
            .finish()
    }
}

/// Statistics about a built registry
#[derive(Debug, Clone, Serialize)]
pub struct RegistryStats {
    pub total_handlers: usize,
    pub duplicates_discarded: usize,
    pub default_root_installed: bool,
    pub categories: Vec<String>,
    pub built_at: DateTime<Utc>,
}

/// Immutable set of registry entries keyed by failure category
pub struct HandlerRegistry {
    entries: HashMap<FailureCategory, RegistryEntry>,
    stats: RegistryStats,
}

impl HandlerRegistry {
    /// Build a registry from an ordered list of registrations.
    ///
    /// Registrations are processed in input order; the first handler bound to
    /// a category wins, later ones for the same category are discarded. A
    /// default root entry is synthesized when the input supplies none. Fails
    /// with [`DispatchError::HandlerBinding`] if any registration names a
    /// category outside the taxonomy.
    pub fn build(
        taxonomy: &FailureTaxonomy,
        registrations: Vec<HandlerRegistration>,
        config: &DispatchConfig,
    ) -> Result<Self> {
        let mut entries: HashMap<FailureCategory, RegistryEntry> = HashMap::new();
        let mut duplicates_discarded = 0;

        for registration in registrations {
            let (category, handler) = registration.into_parts();

            if !taxonomy.contains(&category) {
                return Err(DispatchError::handler_binding(
                    category.as_str(),
                    "category is not part of the failure taxonomy",
                ));
            }

            match entries.entry(category) {
                Entry::Occupied(existing) => {
                    duplicates_discarded += 1;
                    warn!(
                        category = %existing.key(),
                        kept = existing.get().handler().name(),
                        discarded = handler.name(),
                        "More than one handler bound to category; first registration wins"
                    );
                }
                Entry::Vacant(slot) => {
                    let category = slot.key().clone();
                    slot.insert(RegistryEntry::new(category, handler));
                }
            }
        }

        let default_root_installed = !entries.contains_key(taxonomy.root());
        if default_root_installed {
            warn!(
                root = %taxonomy.root(),
                "No handler bound for the root category. Using default."
            );
            let root = taxonomy.root().clone();
            let handler = Arc::new(DefaultRootHandler {
                status_code: config.default_status_code,
            });
            entries.insert(root.clone(), RegistryEntry::new(root, handler));
        }

        let mut categories: Vec<String> = entries
            .keys()
            .map(|category| category.to_string())
            .collect();
        categories.sort();

        let stats = RegistryStats {
            total_handlers: entries.len(),
            duplicates_discarded,
            default_root_installed,
            categories,
            built_at: Utc::now(),
        };

        debug!(
            total_handlers = stats.total_handlers,
            duplicates_discarded = stats.duplicates_discarded,
            default_root_installed = stats.default_root_installed,
            "Handler registry built"
        );

        Ok(Self { entries, stats })
    }

    /// Look up the entry bound to a category, if any
    pub fn get(&self, category: &FailureCategory) -> Option<&RegistryEntry> {
        self.entries.get(category)
    }

    /// Whether an entry is bound to the category
    pub fn contains(&self, category: &FailureCategory) -> bool {
        self.entries.contains_key(category)
    }

    /// Number of entries, the synthesized root entry included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// A built registry always holds at least the root entry
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Statistics recorded at build time
    pub fn stats(&self) -> &RegistryStats {
        &self.stats
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("categories", &self.stats.categories)
            .field("total_handlers", &self.stats.total_handlers)
            .finish()
    }
}
