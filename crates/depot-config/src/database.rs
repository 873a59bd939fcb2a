//! libSQL store configuration.

use serde::{Deserialize, Serialize};

fn default_path() -> String {
    ".depot/depot.db".into()
}

/// Default number of attempts for transient remote errors.
const fn default_retry_attempts() -> u32 {
    4
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Local database file, or `":memory:"`.
    #[serde(default = "default_path")]
    pub path: String,

    /// Remote libSQL URL (e.g. `libsql://depot-org.turso.io`).
    #[serde(default)]
    pub url: String,

    /// Auth token for the remote database.
    #[serde(default)]
    pub auth_token: String,

    /// Attempts (including the first) for transient remote errors.
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            url: String::new(),
            auth_token: String::new(),
            retry_attempts: default_retry_attempts(),
        }
    }
}

impl DatabaseConfig {
    /// Whether a remote database is configured (URL and token both set).
    pub fn is_remote(&self) -> bool {
        !self.url.is_empty() && !self.auth_token.is_empty()
    }
}
