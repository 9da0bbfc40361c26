//! # Dispatch Configuration
//!
//! Engine tunables, deserializable so host applications can source them from
//! their own configuration layer.

use serde::{Deserialize, Serialize};

/// Configuration for a dispatch facade
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Status code returned by the synthesized root handler when no handler
    /// was supplied for the root category
    #[serde(default = "default_status_code")]
    pub default_status_code: u16,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            default_status_code: default_status_code(),
        }
    }
}

fn default_status_code() -> u16 {
    500
}
