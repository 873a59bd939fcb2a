//! Ban gate: the only way to obtain an [`Authorized`].
//!
//! `authorize` serves from the session role cache while the entry is younger
//! than the revalidation window and belongs to the current principal;
//! otherwise it resolves against the identity store. A banned resolution
//! always invalidates the cache and signs the principal out before the error
//! is returned.

use std::time::Duration;

use chrono::Utc;

use crate::authorized::{AuthSource, Authorized};
use crate::cache::{CachedIdentity, RoleCacheStore, SessionRoleCache};
use crate::error::AuthError;
use crate::principal::Principal;
use crate::resolver::{Resolution, RoleResolver, UnresolvedReason};
use crate::session_store::SessionProvider;

pub struct SessionGate<R, P> {
    resolver: R,
    provider: P,
    cache: RoleCacheStore,
    revalidate_after: Duration,
}

impl<R: RoleResolver, P: SessionProvider> SessionGate<R, P> {
    pub const fn new(
        resolver: R,
        provider: P,
        cache: RoleCacheStore,
        revalidate_after: Duration,
    ) -> Self {
        Self {
            resolver,
            provider,
            cache,
            revalidate_after,
        }
    }

    pub const fn resolver(&self) -> &R {
        &self.resolver
    }

    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Start a session for `email` and resolve its role.
    ///
    /// # Errors
    ///
    /// `Banned` (the new session is already torn down), `Unresolved`,
    /// `StoreUnavailable`, or a session/cache storage error.
    pub async fn sign_in(&self, email: &str) -> Result<Authorized, AuthError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AuthError::Unresolved {
                email: String::new(),
            });
        }
        let principal = self.provider.sign_in(email)?;
        tracing::info!(%email, "signed in");
        let cache = self.cache.for_session(&principal.session_id);
        self.revalidate(&principal, &cache).await
    }

    /// Authorize the current principal, using the cache when it is recent.
    ///
    /// # Errors
    ///
    /// `NotSignedIn`, `Banned`, `Unresolved`, `StoreUnavailable`, or a
    /// session/cache storage error.
    pub async fn authorize(&self) -> Result<Authorized, AuthError> {
        let principal = self.current()?;
        let cache = self.cache.for_session(&principal.session_id);

        if let Some(entry) = cache.get()? {
            if entry.identity.email != principal.email {
                tracing::debug!(email = %principal.email, "cached identity belongs to another principal");
                cache.invalidate()?;
            } else if self.within_window(&entry) {
                tracing::debug!(email = %principal.email, "role cache hit");
                return Ok(Authorized::new(
                    entry.identity,
                    entry.resolved_at,
                    AuthSource::Cached,
                    None,
                ));
            } else {
                tracing::debug!(email = %principal.email, "role cache expired");
            }
        }

        self.revalidate(&principal, &cache).await
    }

    /// Authorize against the identity store, bypassing the cache.
    ///
    /// # Errors
    ///
    /// Same as [`Self::authorize`].
    pub async fn authorize_fresh(&self) -> Result<Authorized, AuthError> {
        let principal = self.current()?;
        let cache = self.cache.for_session(&principal.session_id);
        self.revalidate(&principal, &cache).await
    }

    /// The cached identity for display only. Never use it to gate an action.
    ///
    /// # Errors
    ///
    /// Returns a session or cache storage error.
    pub fn cached_identity(&self) -> Result<Option<CachedIdentity>, AuthError> {
        let Some(principal) = self.provider.current_principal()? else {
            return Ok(None);
        };
        let entry = self.cache.for_session(&principal.session_id).get()?;
        Ok(entry.filter(|e| e.identity.email == principal.email))
    }

    /// End the session and drop its cache entry.
    ///
    /// # Errors
    ///
    /// Returns a session or cache storage error.
    pub fn sign_out(&self) -> Result<(), AuthError> {
        if let Some(principal) = self.provider.current_principal()? {
            self.cache.for_session(&principal.session_id).invalidate()?;
            tracing::info!(email = %principal.email, "signed out");
        }
        self.provider.sign_out()
    }

    fn current(&self) -> Result<Principal, AuthError> {
        self.provider
            .current_principal()?
            .ok_or(AuthError::NotSignedIn)
    }

    fn within_window(&self, entry: &CachedIdentity) -> bool {
        let age = Utc::now() - entry.resolved_at;
        age >= chrono::Duration::zero()
            && chrono::Duration::from_std(self.revalidate_after).is_ok_and(|max| age < max)
    }

    async fn revalidate(
        &self,
        principal: &Principal,
        cache: &SessionRoleCache,
    ) -> Result<Authorized, AuthError> {
        // Store failures propagate; the cache is never substituted for a failed check.
        let resolution = self.resolver.resolve(&principal.email).await?;
        match resolution {
            Resolution::Resolved { identity, warning } => {
                let now = Utc::now();
                cache.set(&identity, now)?;
                Ok(Authorized::new(identity, now, AuthSource::Fresh, warning))
            }
            Resolution::Unresolved(UnresolvedReason::Banned) => {
                self.force_sign_out(principal, cache);
                Err(AuthError::Banned {
                    email: principal.email.clone(),
                })
            }
            Resolution::Unresolved(UnresolvedReason::NoMatch) => {
                cache.invalidate()?;
                Err(AuthError::Unresolved {
                    email: principal.email.clone(),
                })
            }
        }
    }

    /// Best effort: a storage failure here must not mask the ban.
    fn force_sign_out(&self, principal: &Principal, cache: &SessionRoleCache) {
        if let Err(error) = cache.invalidate() {
            tracing::error!(%error, "failed to invalidate role cache for banned principal");
        }
        match self.provider.sign_out() {
            Ok(()) => tracing::info!(email = %principal.email, "forced sign-out after ban"),
            Err(error) => {
                tracing::error!(%error, email = %principal.email, "forced sign-out failed");
            }
        }
    }
}
