//! # depot-db
//!
//! libSQL storage for Depot: the three identity tables, the internal
//! `contact` message store, the public `contact_us` submission log, and the
//! `subjects` lookup table.
//!
//! Opens either a local file (or `":memory:"` in tests) or a remote libSQL
//! endpoint. Remote calls that fail with a transient infrastructure error are
//! retried with exponential backoff; see [`retry`].

pub mod error;
pub mod helpers;
mod migrations;
pub mod predicate;
pub mod repos;
pub mod retry;
pub mod service;
pub mod updates;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;
use libsql::params::IntoParams;
use retry::{RetryConfig, is_transient_error};

/// Central database handle.
///
/// Wraps a libSQL database and connection and provides ID generation plus
/// retrying query helpers used by every repository.
pub struct DepotDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
    remote: bool,
    retry: RetryConfig,
}

impl DepotDb {
    /// Open a local database at the given path.
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        if path != ":memory:"
            && let Some(parent) = std::path::Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::Other(anyhow::anyhow!("create {}: {e}", parent.display()))
            })?;
        }

        let db = Builder::new_local(path).build().await?;
        Self::finish_open(db, false, RetryConfig::default()).await
    }

    /// Open a remote libSQL database.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the connection or migrations fail.
    pub async fn open_remote(
        url: &str,
        auth_token: &str,
        retry: RetryConfig,
    ) -> Result<Self, DatabaseError> {
        let db = Builder::new_remote(url.to_string(), auth_token.to_string())
            .build()
            .await?;
        tracing::debug!(%url, "opened remote libSQL database");
        Self::finish_open(db, true, retry).await
    }

    async fn finish_open(
        db: libsql::Database,
        remote: bool,
        retry: RetryConfig,
    ) -> Result<Self, DatabaseError> {
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let depot_db = Self {
            db,
            conn,
            remote,
            retry,
        };
        depot_db.run_migrations().await?;
        Ok(depot_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Returns whether this handle talks to a remote endpoint.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        self.remote
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"msg-a3f8b2c1"`.
    ///
    /// Uses `randomblob(4)` in SQL to produce 8-char hex, then prepends the prefix.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let sql = format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))");
        let mut rows = self.query_with(&sql, || ()).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }

    /// Run a query, retrying transient remote failures.
    ///
    /// Takes a closure so the parameters can be rebuilt for every attempt.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::LibSql` once the attempt budget is spent or on
    /// the first non-transient error.
    pub async fn query_with<F, P>(&self, sql: &str, params: F) -> Result<libsql::Rows, DatabaseError>
    where
        F: Fn() -> P + Send + Sync,
        P: IntoParams + Send,
    {
        let mut attempt = 1;
        loop {
            match self.conn.query(sql, params()).await {
                Ok(rows) => return Ok(rows),
                Err(e) if self.should_retry(&e, attempt) => {
                    self.backoff(&e, attempt).await;
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Execute a statement, retrying transient remote failures. Returns the
    /// number of affected rows.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::LibSql` once the attempt budget is spent or on
    /// the first non-transient error.
    pub async fn execute_with<F, P>(&self, sql: &str, params: F) -> Result<u64, DatabaseError>
    where
        F: Fn() -> P + Send + Sync,
        P: IntoParams + Send,
    {
        let mut attempt = 1;
        loop {
            match self.conn.execute(sql, params()).await {
                Ok(n) => return Ok(n),
                Err(e) if self.should_retry(&e, attempt) => {
                    self.backoff(&e, attempt).await;
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn should_retry(&self, e: &libsql::Error, attempt: u32) -> bool {
        self.remote && attempt < self.retry.max_attempts && is_transient_error(e)
    }

    async fn backoff(&self, e: &libsql::Error, attempt: u32) {
        let delay = self.retry.delay_for(attempt);
        tracing::warn!(
            attempt,
            max_attempts = self.retry.max_attempts,
            ?delay,
            error = %e,
            "transient store error, retrying"
        );
        tokio::time::sleep(delay).await;
    }
}
