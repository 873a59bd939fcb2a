//! Admin-only ban management.

use std::time::Duration;

use depot_core::entities::Role;
use depot_core::enums::{AdminRole, IdentityTable};

use crate::authorized::Authorized;
use crate::error::AuthError;
use crate::resolver::IdentityStore;

pub struct Moderator<S> {
    store: S,
    max_age: Duration,
}

impl<S: IdentityStore> Moderator<S> {
    /// `max_age` bounds how old the actor's authorization may be.
    pub const fn new(store: S, max_age: Duration) -> Self {
        Self { store, max_age }
    }

    /// Set or clear the ban flag on `email` in `table`.
    ///
    /// Returns whether a record was changed. A banned principal loses access
    /// on its next authorization outside the cache window.
    ///
    /// # Errors
    ///
    /// `Forbidden` unless the actor is an admin with the `admin` sub-role and
    /// was verified within `max_age`; `StoreUnavailable` on store failure.
    pub async fn set_ban(
        &self,
        actor: &Authorized,
        table: IdentityTable,
        email: &str,
        banned: bool,
    ) -> Result<bool, AuthError> {
        if actor.identity().role
            != (Role::Admin {
                sub_role: AdminRole::Admin,
            })
        {
            return Err(AuthError::Forbidden(format!(
                "{} may not change ban flags",
                actor.identity().role.label()
            )));
        }
        if !actor.is_fresh(self.max_age) {
            return Err(AuthError::Forbidden(
                "authorization too old; re-validate and retry".into(),
            ));
        }
        if actor.identity().email == email && banned {
            return Err(AuthError::Forbidden("admins cannot ban themselves".into()));
        }

        let changed = self.store.set_banned(table, email, banned).await?;
        tracing::info!(actor = %actor.identity().email, %table, %email, banned, changed, "ban flag set");
        Ok(changed)
    }
}
