//! Role resolution: email -> at most one [`Identity`], with ban enforcement.
//!
//! The three identity tables are queried concurrently and evaluated in
//! [`IdentityTable::RESOLUTION_ORDER`] (driver, admin, coordinator). Any banned
//! match makes the whole resolution banned, so a second, unbanned registration
//! cannot be used to dodge a ban.

use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use depot_core::entities::{Identity, IdentityRecord};
use depot_core::enums::{AdminRole, IdentityTable};
use depot_db::error::DatabaseError;
use depot_db::service::DepotService;

use crate::error::AuthError;

// ---------------------------------------------------------------------------
// Identity store seam
// ---------------------------------------------------------------------------

/// Read access to the identity tables, plus the ban flag for moderation.
pub trait IdentityStore: Send + Sync {
    fn find_by_email(
        &self,
        table: IdentityTable,
        email: &str,
    ) -> impl Future<Output = Result<Option<IdentityRecord>, DatabaseError>> + Send;

    fn set_banned(
        &self,
        table: IdentityTable,
        email: &str,
        banned: bool,
    ) -> impl Future<Output = Result<bool, DatabaseError>> + Send;
}

impl IdentityStore for DepotService {
    async fn find_by_email(
        &self,
        table: IdentityTable,
        email: &str,
    ) -> Result<Option<IdentityRecord>, DatabaseError> {
        self.find_identity_record(table, email).await
    }

    async fn set_banned(
        &self,
        table: IdentityTable,
        email: &str,
        banned: bool,
    ) -> Result<bool, DatabaseError> {
        self.set_identity_banned(table, email, banned).await
    }
}

impl<S: IdentityStore> IdentityStore for Arc<S> {
    fn find_by_email(
        &self,
        table: IdentityTable,
        email: &str,
    ) -> impl Future<Output = Result<Option<IdentityRecord>, DatabaseError>> + Send {
        (**self).find_by_email(table, email)
    }

    fn set_banned(
        &self,
        table: IdentityTable,
        email: &str,
        banned: bool,
    ) -> impl Future<Output = Result<bool, DatabaseError>> + Send {
        (**self).set_banned(table, email, banned)
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// A principal matched more than one identity table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityWarning {
    pub email: String,
    /// Every matching table, in resolution order.
    pub tables: Vec<IdentityTable>,
    pub chosen: IdentityTable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedReason {
    NoMatch,
    Banned,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved {
        identity: Identity,
        warning: Option<IntegrityWarning>,
    },
    Unresolved(UnresolvedReason),
}

/// Resolves an authenticated email to a role.
///
/// Implementations other than [`TableRoleResolver`] (e.g. one backed by an
/// external identity provider) must apply the same ban semantics.
pub trait RoleResolver: Send + Sync {
    fn resolve(&self, email: &str) -> impl Future<Output = Result<Resolution, AuthError>> + Send;
}

impl<R: RoleResolver> RoleResolver for Arc<R> {
    fn resolve(&self, email: &str) -> impl Future<Output = Result<Resolution, AuthError>> + Send {
        (**self).resolve(email)
    }
}

/// Decide the outcome from every record that matched, in resolution order.
#[must_use]
pub fn evaluate(email: &str, matches: &[IdentityRecord]) -> Resolution {
    let Some(first) = matches.first() else {
        return Resolution::Unresolved(UnresolvedReason::NoMatch);
    };

    if let Some(banned) = matches.iter().find(|r| r.banned) {
        tracing::warn!(%email, table = %banned.table, "banned identity record matched");
        return Resolution::Unresolved(UnresolvedReason::Banned);
    }

    let warning = (matches.len() > 1).then(|| {
        let tables: Vec<IdentityTable> = matches.iter().map(|r| r.table).collect();
        tracing::warn!(
            %email,
            ?tables,
            chosen = %first.table,
            "principal registered in several identity tables"
        );
        IntegrityWarning {
            email: email.to_string(),
            tables,
            chosen: first.table,
        }
    });

    if first.table == IdentityTable::Admin {
        let (_, recognised) = AdminRole::from_column(first.admin_role.as_deref());
        if !recognised {
            tracing::warn!(
                %email,
                stored = ?first.admin_role,
                "admin sub-role missing or unknown; using viewer"
            );
        }
    }

    Resolution::Resolved {
        identity: first.to_identity(),
        warning,
    }
}

/// Resolves roles by direct lookup in the three identity tables.
#[derive(Debug, Clone)]
pub struct TableRoleResolver<S> {
    store: S,
}

impl<S: IdentityStore> TableRoleResolver<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }
}

impl<S: IdentityStore> RoleResolver for TableRoleResolver<S> {
    async fn resolve(&self, email: &str) -> Result<Resolution, AuthError> {
        if email.trim().is_empty() {
            return Ok(Resolution::Unresolved(UnresolvedReason::NoMatch));
        }

        let [first, second, third] = IdentityTable::RESOLUTION_ORDER;
        let (a, b, c) = tokio::try_join!(
            self.store.find_by_email(first, email),
            self.store.find_by_email(second, email),
            self.store.find_by_email(third, email),
        )?;
        let matches: Vec<IdentityRecord> = [a, b, c].into_iter().flatten().collect();

        let resolution = evaluate(email, &matches);
        tracing::debug!(%email, matched = matches.len(), ?resolution, "role resolved");
        Ok(resolution)
    }
}
