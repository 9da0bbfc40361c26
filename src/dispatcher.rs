//! # Dispatch Facade
//!
//! The single object exposed to callers: built once from a taxonomy and a
//! registration list, then queried with `handle` for every failure.
//!
//! ## Overview
//!
//! Construction runs the registry build (deduplication, binding validation,
//! root default) and fails with whatever error the build raised; nothing is
//! swallowed and no partially-usable facade exists. After construction the
//! facade is immutable, so `handle` may be called from any number of
//! concurrent callers without coordination.
//!
//! ## Usage
//!
//! ```rust
//! use failure_dispatch::dispatcher::FailureDispatcher;
//! use failure_dispatch::handler::{Failure, HandlerRegistration, HandlingResult};
//! use failure_dispatch::taxonomy::{FailureCategory, FailureTaxonomy};
//! use std::any::Any;
//! use std::sync::Arc;
//!
//! struct StaleReadFailure;
//!
//! impl Failure for StaleReadFailure {
//!     fn category(&self) -> FailureCategory {
//!         FailureCategory::new("stale_read_failure")
//!     }
//!
//!     fn as_any(&self) -> &dyn Any {
//!         self
//!     }
//! }
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let taxonomy = FailureTaxonomy::new("failure")
//!     .with_category("storage_failure", "failure")?
//!     .with_category("stale_read_failure", "storage_failure")?;
//!
//! let registrations = vec![HandlerRegistration::from_fn("storage_failure", |_failure| {
//!     HandlingResult::with_payload(503, "storage unavailable".to_string())
//! })];
//!
//! let dispatcher = FailureDispatcher::new(Arc::new(taxonomy), registrations)?;
//!
//! let result = dispatcher.handle(Some(&StaleReadFailure))?;
//! assert_eq!(result.status_code(), 503);
//! assert_eq!(result.payload_as::<String>().unwrap(), "storage unavailable");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

use crate::config::DispatchConfig;
use crate::error::{DispatchError, Result};
use crate::handler::{Failure, HandlerRegistration, HandlingResult};
use crate::registry::{HandlerRegistry, RegistryStats, Resolver};
use crate::taxonomy::FailureTaxonomy;
use std::sync::Arc;
use tracing::{debug, info};

/// Facade over the handler registry and the resolver
pub struct FailureDispatcher {
    taxonomy: Arc<FailureTaxonomy>,
    registry: HandlerRegistry,
}

impl FailureDispatcher {
    /// Build a dispatcher with the default configuration
    pub fn new(
        taxonomy: Arc<FailureTaxonomy>,
        registrations: Vec<HandlerRegistration>,
    ) -> Result<Self> {
        Self::with_config(taxonomy, registrations, DispatchConfig::default())
    }

    /// Build a dispatcher with an explicit configuration.
    ///
    /// Propagates registry build errors; a failed build produces no facade.
    pub fn with_config(
        taxonomy: Arc<FailureTaxonomy>,
        registrations: Vec<HandlerRegistration>,
        config: DispatchConfig,
    ) -> Result<Self> {
        let registry = HandlerRegistry::build(&taxonomy, registrations, &config)?;

        info!(handlers = registry.len(), "Failure dispatcher initialized");
        debug!(categories = ?registry.stats().categories, "Will handle");

        Ok(Self { taxonomy, registry })
    }

    /// Handle a failure instance.
    ///
    /// `None` is the absent-instance caller bug and fails with
    /// [`DispatchError::NullFailure`]. Otherwise the most specific registered
    /// handler is resolved and invoked; its result is returned unchanged.
    pub fn handle(&self, failure: Option<&dyn Failure>) -> Result<HandlingResult> {
        let failure = failure.ok_or(DispatchError::NullFailure)?;
        let concrete = failure.category();

        let resolver = Resolver::new(&self.taxonomy, &self.registry);
        let resolution = resolver.resolve(&concrete)?;

        Ok(resolution.handler().handle(failure))
    }

    /// The taxonomy this dispatcher classifies against
    pub fn taxonomy(&self) -> &FailureTaxonomy {
        &self.taxonomy
    }

    /// The built registry
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Registry statistics recorded at build time
    pub fn stats(&self) -> &RegistryStats {
        self.registry.stats()
    }
}
