//! # Dispatch Error Types
//!
//! Structured error handling for the dispatch engine using thiserror
//! instead of `Box<dyn Error>` patterns.

use crate::taxonomy::TaxonomyError;
use thiserror::Error;

/// Errors raised by the dispatch engine
#[derive(Error, Debug)]
pub enum DispatchError {
    /// A registration could not be bound: its category is not part of the
    /// failure taxonomy. Fatal to registry construction.
    #[error("Handler binding error for category {category}: {reason}")]
    HandlerBinding { category: String, reason: String },

    /// `handle` was invoked without a failure instance. Caller bug.
    #[error("Cannot handle an absent failure instance")]
    NullFailure,

    /// Resolution found no entry, including the guaranteed root entry. This
    /// indicates a broken hierarchy, not a normal runtime condition.
    #[error("No handler resolved for category {category}: the root entry is unreachable")]
    NoHandler { category: String },

    /// The application supplied an invalid hierarchy definition.
    #[error("Taxonomy error: {0}")]
    Taxonomy(#[from] TaxonomyError),

    /// The factory was asked for a registration group that was never added.
    #[error("Unknown registration group: {name}")]
    UnknownGroup { name: String },
}

impl DispatchError {
    /// Create a handler binding error
    pub fn handler_binding(category: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::HandlerBinding {
            category: category.into(),
            reason: reason.into(),
        }
    }

    /// Create a no-handler error
    pub fn no_handler(category: impl Into<String>) -> Self {
        Self::NoHandler {
            category: category.into(),
        }
    }

    /// Create an unknown-group error
    pub fn unknown_group(name: impl Into<String>) -> Self {
        Self::UnknownGroup { name: name.into() }
    }
}

pub type Result<T> = std::result::Result<T, DispatchError>;
