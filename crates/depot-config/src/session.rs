//! Session and role-cache configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Reads may reuse a cached role resolution for this long.
const fn default_revalidate_after_secs() -> u64 {
    60
}

/// State mutations require an authorization at most this old.
const fn default_mutation_max_age_secs() -> u64 {
    5
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Directory holding one role-cache file per session. Empty means
    /// `~/.depot/sessions`.
    #[serde(default)]
    pub cache_dir: String,

    /// Bounded staleness window for cached role resolutions, in seconds.
    #[serde(default = "default_revalidate_after_secs")]
    pub revalidate_after_secs: u64,

    /// Maximum authorization age accepted by read/starred mutations, in seconds.
    #[serde(default = "default_mutation_max_age_secs")]
    pub mutation_max_age_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cache_dir: String::new(),
            revalidate_after_secs: default_revalidate_after_secs(),
            mutation_max_age_secs: default_mutation_max_age_secs(),
        }
    }
}

impl SessionConfig {
    /// Resolved cache directory, `None` when no home directory exists.
    pub fn cache_dir(&self) -> Option<PathBuf> {
        if self.cache_dir.is_empty() {
            dirs::home_dir().map(|h| h.join(".depot").join("sessions"))
        } else {
            Some(PathBuf::from(&self.cache_dir))
        }
    }

    pub const fn revalidate_after(&self) -> Duration {
        Duration::from_secs(self.revalidate_after_secs)
    }

    pub const fn mutation_max_age(&self) -> Duration {
        Duration::from_secs(self.mutation_max_age_secs)
    }
}
