use std::time::Duration;

use depot_config::DepotConfig;
use depot_core::enums::MergeOrder;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboxSettings {
    pub merge_order: MergeOrder,
    /// Per-source row limit for one fetch.
    pub limit: u32,
    /// Oldest authorization accepted for a state mutation.
    pub mutation_max_age: Duration,
}

impl Default for InboxSettings {
    fn default() -> Self {
        Self {
            merge_order: MergeOrder::Grouped,
            limit: 100,
            mutation_max_age: Duration::from_secs(5),
        }
    }
}

impl InboxSettings {
    #[must_use]
    pub const fn from_config(config: &DepotConfig) -> Self {
        Self {
            merge_order: config.inbox.merge_order,
            limit: config.inbox.default_limit,
            mutation_max_age: config.session.mutation_max_age(),
        }
    }
}
