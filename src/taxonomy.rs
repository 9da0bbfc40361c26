//! # Failure Taxonomy
//!
//! Explicit single-rooted hierarchy of failure categories used as the
//! classification key space for handler dispatch.
//!
//! ## Overview
//!
//! The taxonomy models the failure type hierarchy as data: every category has
//! exactly one parent except the root, which matches any failure. Because a
//! category can only be added under a parent that is already registered, the
//! hierarchy is acyclic and finite-depth by construction; no separate
//! validation pass is needed.
//!
//! ## Usage
//!
//! ```rust
//! use failure_dispatch::taxonomy::FailureTaxonomy;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut taxonomy = FailureTaxonomy::new("failure");
//! taxonomy.add_category("runtime_failure", "failure")?;
//! taxonomy.add_category("null_reference_failure", "runtime_failure")?;
//!
//! assert!(taxonomy.is_root(&"failure".into()));
//! assert_eq!(
//!     taxonomy.distance(&"null_reference_failure".into(), &"failure".into()),
//!     Some(2)
//! );
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Identifier of a node in the failure hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FailureCategory(String);

impl FailureCategory {
    /// Create a new category identifier
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The category name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for FailureCategory {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for FailureCategory {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// Errors raised while building a taxonomy
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaxonomyError {
    #[error("Unknown parent category: {parent} (while registering {child})")]
    UnknownParent { child: String, parent: String },

    #[error("Category already registered: {category}")]
    DuplicateCategory { category: String },
}

/// Single-rooted failure category hierarchy with an explicit parent table
#[derive(Debug, Clone)]
pub struct FailureTaxonomy {
    /// The universal category; ancestor of every other category
    root: FailureCategory,
    /// Child to parent mapping; the root has no entry here
    parents: HashMap<FailureCategory, FailureCategory>,
}

impl FailureTaxonomy {
    /// Create a taxonomy containing only the root category
    pub fn new(root: impl Into<FailureCategory>) -> Self {
        Self {
            root: root.into(),
            parents: HashMap::new(),
        }
    }

    /// The root category
    pub fn root(&self) -> &FailureCategory {
        &self.root
    }

    /// Register a category under an existing parent.
    ///
    /// The parent must already be part of the taxonomy, which keeps the
    /// hierarchy acyclic and finite-depth without a validation pass.
    /// Re-registering an existing name is rejected rather than re-parented.
    pub fn add_category(
        &mut self,
        child: impl Into<FailureCategory>,
        parent: impl Into<FailureCategory>,
    ) -> Result<(), TaxonomyError> {
        let child = child.into();
        let parent = parent.into();

        if !self.contains(&parent) {
            return Err(TaxonomyError::UnknownParent {
                child: child.to_string(),
                parent: parent.to_string(),
            });
        }
        if self.contains(&child) {
            return Err(TaxonomyError::DuplicateCategory {
                category: child.to_string(),
            });
        }

        debug!(category = %child, parent = %parent, "Registered failure category");
        self.parents.insert(child, parent);
        Ok(())
    }

    /// Builder-style variant of [`add_category`](Self::add_category)
    pub fn with_category(
        mut self,
        child: impl Into<FailureCategory>,
        parent: impl Into<FailureCategory>,
    ) -> Result<Self, TaxonomyError> {
        self.add_category(child, parent)?;
        Ok(self)
    }

    /// Whether the category is part of this taxonomy
    pub fn contains(&self, category: &FailureCategory) -> bool {
        *category == self.root || self.parents.contains_key(category)
    }

    /// Whether the category is the root
    pub fn is_root(&self, category: &FailureCategory) -> bool {
        *category == self.root
    }

    /// The parent of a category; `None` for the root and for unknown categories
    pub fn parent_of(&self, category: &FailureCategory) -> Option<&FailureCategory> {
        self.parents.get(category)
    }

    /// The chain of categories from `category` up to the root, inclusive.
    ///
    /// Position in the chain is the ancestor distance: index 0 is the
    /// category itself, the last index is the root. Returns `None` for a
    /// category that is not part of the taxonomy.
    pub fn ancestor_chain(&self, category: &FailureCategory) -> Option<Vec<&FailureCategory>> {
        if !self.contains(category) {
            return None;
        }

        let mut chain = Vec::new();
        let mut current = self.parents.get_key_value(category).map_or(&self.root, |(child, _)| child);
        chain.push(current);
        while let Some(parent) = self.parents.get(current) {
            chain.push(parent);
            current = parent;
        }
        Some(chain)
    }

    /// Number of parent hops from `from` up to `to`.
    ///
    /// Returns `Some(0)` when both are the same category and `None` when `to`
    /// is not an ancestor of `from`.
    pub fn distance(&self, from: &FailureCategory, to: &FailureCategory) -> Option<usize> {
        self.ancestor_chain(from)?
            .iter()
            .position(|ancestor| *ancestor == to)
    }

    /// Total number of categories, including the root
    pub fn len(&self) -> usize {
        self.parents.len() + 1
    }

    /// A taxonomy is never empty; it always holds the root
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterate over all categories, root included, in no particular order
    pub fn categories(&self) -> impl Iterator<Item = &FailureCategory> {
        std::iter::once(&self.root).chain(self.parents.keys())
    }
}
