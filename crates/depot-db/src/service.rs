//! Service layer that hosts every repository method.
//!
//! `DepotService` wraps a [`DepotDb`]; repositories under [`crate::repos`]
//! add methods to it via `impl DepotService` blocks.

use crate::DepotDb;
use crate::error::DatabaseError;
use crate::retry::RetryConfig;

pub struct DepotService {
    db: DepotDb,
}

impl DepotService {
    /// Create a service over a local database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        Ok(Self {
            db: DepotDb::open_local(db_path).await?,
        })
    }

    /// Create a service backed by a remote libSQL endpoint.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the connection cannot be established.
    pub async fn new_remote(
        url: &str,
        auth_token: &str,
        retry: RetryConfig,
    ) -> Result<Self, DatabaseError> {
        Ok(Self {
            db: DepotDb::open_remote(url, auth_token, retry).await?,
        })
    }

    /// Create from an existing `DepotDb`.
    #[must_use]
    pub const fn from_db(db: DepotDb) -> Self {
        Self { db }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &DepotDb {
        &self.db
    }
}
