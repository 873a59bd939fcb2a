//! # depot-config
//!
//! Layered configuration loading for Depot using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`DEPOT_*` prefix, `__` as separator)
//! 2. Project-level `.depot/config.toml`
//! 3. User-level `~/.config/depot/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `DEPOT_DATABASE__URL` -> `database.url`,
//! `DEPOT_SESSION__REVALIDATE_AFTER_SECS` -> `session.revalidate_after_secs`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use depot_config::DepotConfig;
//!
//! let config = DepotConfig::load_with_dotenv().expect("config");
//! if config.database.is_remote() {
//!     println!("remote store: {}", config.database.url);
//! }
//! ```

mod database;
mod error;
mod inbox;
mod session;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use inbox::InboxConfig;
pub use session::SessionConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DepotConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub inbox: InboxConfig,
}

impl DepotConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or the result is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    /// Load configuration after reading `.env` from the current directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or the result is invalid.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Extract and validate from an explicit figment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or the result is invalid.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(".depot/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("DEPOT_").split("__"))
    }

    /// Reject combinations that would make authorization impossible or
    /// listings empty.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field, or
    /// `ConfigError::NotConfigured` for a half-configured remote database.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.is_empty() != self.database.auth_token.is_empty() {
            return Err(ConfigError::NotConfigured {
                section: "database".into(),
            });
        }
        if self.session.mutation_max_age_secs > self.session.revalidate_after_secs {
            return Err(ConfigError::InvalidValue {
                field: "session.mutation_max_age_secs".into(),
                reason: format!(
                    "must not exceed session.revalidate_after_secs ({})",
                    self.session.revalidate_after_secs
                ),
            });
        }
        if self.inbox.default_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "inbox.default_limit".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.database.retry_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "database.retry_attempts".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("depot").join("config.toml"))
    }
}
