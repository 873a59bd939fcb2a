//! Database error types for depot-db.

use thiserror::Error;

use crate::retry::is_transient_error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Invalid state encountered (e.g., bad data in DB).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DatabaseError {
    /// Whether retrying the same call later could succeed.
    ///
    /// Only libSQL errors can be transient; parse failures and missing rows
    /// will fail the same way every time.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::LibSql(e) => is_transient_error(e),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_libsql_errors_are_permanent() {
        assert!(!DatabaseError::NoResult.is_transient());
        assert!(!DatabaseError::Query("bad".into()).is_transient());
        assert!(!DatabaseError::InvalidState("x".into()).is_transient());
    }

    #[test]
    fn lock_contention_is_transient() {
        let err = DatabaseError::LibSql(libsql::Error::ConnectionFailed(
            "unable to acquire shared lock on node".into(),
        ));
        assert!(err.is_transient());
    }
}
