//! Inbox listing configuration.

use depot_core::enums::MergeOrder;
use serde::{Deserialize, Serialize};

/// Default per-source row limit.
const fn default_limit() -> u32 {
    100
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InboxConfig {
    /// How internal and external items are combined.
    #[serde(default)]
    pub merge_order: MergeOrder,

    /// Maximum rows read from each store per listing.
    #[serde(default = "default_limit")]
    pub default_limit: u32,
}

impl Default for InboxConfig {
    fn default() -> Self {
        Self {
            merge_order: MergeOrder::default(),
            default_limit: default_limit(),
        }
    }
}
