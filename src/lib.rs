#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Failure Dispatch
//!
//! Hierarchical failure-handler dispatch engine with most-specific-match
//! resolution.
//!
//! ## Overview
//!
//! Applications register many independent handlers, each specialized for one
//! category of failure in a single-rooted hierarchy. Given an arbitrary
//! failure instance at runtime, the engine deterministically selects the most
//! specific registered handler by walking the instance's ancestor chain and
//! produces a uniform result: a status code plus an optional payload.
//!
//! ## Architecture
//!
//! ```text
//! HandlerRegistration list
//!         │ build (once)
//!         ▼
//! HandlerRegistry ── dedup (first wins) ── root default ── binding checks
//!         │
//!         ▼
//! FailureDispatcher::handle(failure)
//!         │ resolve (per call)
//!         ▼
//! Resolver ── ancestor chain walk ── minimum distance ── HandlingResult
//! ```
//!
//! ## Key Features
//!
//! - **Most-specific-match dispatch**: minimum ancestor distance over an
//!   explicit category hierarchy, unique winner by construction
//! - **Guaranteed fallback**: a root entry always exists, synthesized with a
//!   configurable status code when none is supplied
//! - **Deterministic duplicate policy**: first registration per category
//!   wins; later ones are discarded with a warning, never an error
//! - **Immutable after build**: `handle` is lock-free and safe from any
//!   number of concurrent callers
//! - **Cached factory**: named registration groups assembled into cached
//!   dispatcher facades
//!
//! ## Module Organization
//!
//! - [`taxonomy`] - Failure category hierarchy with explicit parent table
//! - [`handler`] - Failure, handler, and handling-result contracts
//! - [`registry`] - Registry construction and resolution
//! - [`dispatcher`] - The dispatch facade
//! - [`factory`] - Cached facade construction from registration groups
//! - [`config`] - Engine tunables
//! - [`error`] - Structured error handling
//! - [`logging`] - Optional tracing-subscriber initialization for hosts
//!
//! ## Quick Start
//!
//! ```rust
//! use failure_dispatch::{
//!     Failure, FailureCategory, FailureDispatcher, FailureTaxonomy, HandlerRegistration,
//!     HandlingResult,
//! };
//! use std::any::Any;
//! use std::sync::Arc;
//!
//! struct TimeoutFailure;
//!
//! impl Failure for TimeoutFailure {
//!     fn category(&self) -> FailureCategory {
//!         FailureCategory::new("timeout_failure")
//!     }
//!
//!     fn as_any(&self) -> &dyn Any {
//!         self
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let taxonomy = FailureTaxonomy::new("failure")
//!         .with_category("io_failure", "failure")?
//!         .with_category("timeout_failure", "io_failure")?;
//!
//!     let registrations = vec![HandlerRegistration::from_fn("io_failure", |_failure| {
//!         HandlingResult::with_payload(503, "io unavailable".to_string())
//!     })];
//!
//!     let dispatcher = FailureDispatcher::new(Arc::new(taxonomy), registrations)?;
//!
//!     // timeout_failure has no handler of its own; its io_failure parent wins
//!     let result = dispatcher.handle(Some(&TimeoutFailure))?;
//!     assert_eq!(result.status_code(), 503);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod factory;
pub mod handler;
pub mod logging;
pub mod registry;
pub mod taxonomy;

pub use config::DispatchConfig;
pub use dispatcher::FailureDispatcher;
pub use error::{DispatchError, Result};
pub use factory::{DispatcherFactory, FactoryCacheStats};
pub use handler::{Failure, FailureHandler, HandlerRegistration, HandlingResult};
pub use registry::{HandlerRegistry, RegistryEntry, RegistryStats, Resolution, Resolver};
pub use taxonomy::{FailureCategory, FailureTaxonomy, TaxonomyError};
