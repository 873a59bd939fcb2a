use chrono::{DateTime, Utc};
use serde::Serialize;

use depot_core::entities::Identity;

use crate::resolver::IntegrityWarning;

/// Where an [`Authorized`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthSource {
    /// Resolved against the identity store during this call.
    Fresh,
    /// Read from the session role cache inside the revalidation window.
    Cached,
}

/// Proof that a principal resolved to a non-banned identity at `verified_at`.
///
/// Only [`crate::SessionGate`] constructs this, so every operation that takes
/// `&Authorized` runs after role resolution.
#[derive(Debug, Clone, Serialize)]
pub struct Authorized {
    identity: Identity,
    verified_at: DateTime<Utc>,
    source: AuthSource,
    warning: Option<IntegrityWarning>,
}

impl Authorized {
    pub(crate) const fn new(
        identity: Identity,
        verified_at: DateTime<Utc>,
        source: AuthSource,
        warning: Option<IntegrityWarning>,
    ) -> Self {
        Self {
            identity,
            verified_at,
            source,
            warning,
        }
    }

    #[must_use]
    pub const fn identity(&self) -> &Identity {
        &self.identity
    }

    #[must_use]
    pub const fn verified_at(&self) -> DateTime<Utc> {
        self.verified_at
    }

    #[must_use]
    pub const fn source(&self) -> AuthSource {
        self.source
    }

    #[must_use]
    pub const fn warning(&self) -> Option<&IntegrityWarning> {
        self.warning.as_ref()
    }

    /// Time since the identity was last checked against the store.
    #[must_use]
    pub fn age(&self) -> chrono::Duration {
        Utc::now() - self.verified_at
    }

    /// Whether the last store check is at most `max_age` old.
    #[must_use]
    pub fn is_fresh(&self, max_age: std::time::Duration) -> bool {
        chrono::Duration::from_std(max_age).is_ok_and(|max| self.age() <= max)
    }
}
