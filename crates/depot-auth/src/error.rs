use depot_db::error::DatabaseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// No identity table holds this email. Every role-gated action is denied.
    #[error("no role registered for {email}")]
    Unresolved { email: String },

    /// A matching identity record is banned. The session has been terminated.
    #[error("account {email} is banned; session terminated")]
    Banned { email: String },

    #[error("not signed in; run `depot auth login`")]
    NotSignedIn,

    #[error("identity store unavailable: {reason}")]
    StoreUnavailable { retryable: bool, reason: String },

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("session store error: {0}")]
    SessionStore(String),

    #[error("role cache error: {0}")]
    Cache(String),
}

impl AuthError {
    /// Whether the caller may retry the same operation unchanged.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable { retryable: true, .. })
    }
}

impl From<DatabaseError> for AuthError {
    fn from(e: DatabaseError) -> Self {
        Self::StoreUnavailable {
            retryable: e.is_transient(),
            reason: e.to_string(),
        }
    }
}
