use depot_core::errors::CoreError;
use depot_db::error::DatabaseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InboxError {
    /// The action is not defined for this message or outside the caller's scope.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("message not found: {id}")]
    NotFound { id: String },

    /// The authorization is older than the mutation window; re-validate and retry.
    #[error("authorization is {age_secs}s old (limit {max_secs}s); re-validate and retry")]
    StaleAuthorization { age_secs: i64, max_secs: u64 },

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("message store unavailable: {reason}")]
    StoreUnavailable { retryable: bool, reason: String },
}

impl InboxError {
    /// Map a store error from a lookup of `id`: a missing row is `NotFound`.
    pub(crate) fn lookup(e: DatabaseError, id: &str) -> Self {
        match e {
            DatabaseError::NoResult => Self::NotFound { id: id.to_string() },
            other => other.into(),
        }
    }

    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable { retryable: true, .. })
    }
}

impl From<DatabaseError> for InboxError {
    fn from(e: DatabaseError) -> Self {
        Self::StoreUnavailable {
            retryable: e.is_transient(),
            reason: e.to_string(),
        }
    }
}

impl From<CoreError> for InboxError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::NotFound { id, .. } => Self::NotFound { id },
            CoreError::Validation(msg) => Self::Validation(msg),
            CoreError::InvalidOperation(msg) => Self::InvalidOperation(msg),
            CoreError::Other(e) => Self::StoreUnavailable {
                retryable: false,
                reason: e.to_string(),
            },
        }
    }
}
