//! Message aggregation and state mutation for an authorized principal.

use depot_auth::Authorized;
use depot_core::entities::{ContactSubmission, InternalMessage, MessageView, NewMessage};
use depot_core::enums::{InboxFilter, MergeOrder, MessageSource};
use depot_core::policy::{can_access, predicate};
use depot_db::updates::message::{FlagUpdate, FlagUpdateBuilder};

use crate::error::InboxError;
use crate::settings::InboxSettings;
use crate::store::{ContactFormStore, MessageStore};

/// Combine both sources, newest first.
///
/// `Grouped` keeps the internal block ahead of the external block;
/// `Chronological` interleaves them. Sorting is stable, so equal timestamps
/// keep store order.
#[must_use]
pub fn merge(
    internal: Vec<MessageView>,
    external: Vec<MessageView>,
    order: MergeOrder,
) -> Vec<MessageView> {
    let newest_first = |a: &MessageView, b: &MessageView| b.created_at.cmp(&a.created_at);
    match order {
        MergeOrder::Grouped => {
            let mut internal = internal;
            let mut external = external;
            internal.sort_by(newest_first);
            external.sort_by(newest_first);
            internal.extend(external);
            internal
        }
        MergeOrder::Chronological => {
            let mut all = internal;
            all.extend(external);
            all.sort_by(newest_first);
            all
        }
    }
}

pub struct Inbox<S> {
    store: S,
    settings: InboxSettings,
}

impl<S: MessageStore + ContactFormStore> Inbox<S> {
    pub const fn new(store: S, settings: InboxSettings) -> Self {
        Self { store, settings }
    }

    pub const fn settings(&self) -> &InboxSettings {
        &self.settings
    }

    /// The newest messages `auth` may see on the `filter` tab.
    ///
    /// `settings.limit` caps each source on its own, so a merged list can hold
    /// up to twice that many items. Older rows past the cap are dropped
    /// without any marker. External submissions are merged in only for an
    /// admin on `Important`. Each call re-queries both stores.
    ///
    /// # Errors
    ///
    /// `StoreUnavailable` if either store fails; no partial list is returned.
    pub async fn fetch(
        &self,
        auth: &Authorized,
        filter: InboxFilter,
    ) -> Result<Vec<MessageView>, InboxError> {
        let identity = auth.identity();
        let predicate = predicate(identity, filter);
        let limit = self.settings.limit;

        let (internal, external) = if predicate.include_external {
            let (internal, external) = tokio::try_join!(
                self.store.list_internal(&predicate, limit),
                self.store.list_external(limit),
            )?;
            (internal, external)
        } else {
            (self.store.list_internal(&predicate, limit).await?, Vec::new())
        };

        tracing::debug!(
            email = %identity.email,
            %filter,
            internal = internal.len(),
            external = external.len(),
            "inbox fetched"
        );

        Ok(merge(
            internal.into_iter().map(MessageView::from).collect(),
            external.into_iter().map(MessageView::from).collect(),
            self.settings.merge_order,
        ))
    }

    /// Open a message for display.
    ///
    /// An unread internal message in the caller's inbox scope is marked read
    /// first; a message the caller sent is returned unchanged. External
    /// submissions are admin-only and never mutated.
    ///
    /// # Errors
    ///
    /// `NotFound`, `InvalidOperation` (outside scope, or external for a
    /// non-admin), `StaleAuthorization` when a mark-read is needed, or
    /// `StoreUnavailable`.
    pub async fn open(&self, auth: &Authorized, id: &str) -> Result<MessageView, InboxError> {
        match Self::source_of(id)? {
            MessageSource::External => {
                if !auth.identity().is_admin() {
                    return Err(InboxError::InvalidOperation(
                        "contact-form submissions are visible to admins only".into(),
                    ));
                }
                let message = self
                    .store
                    .get_external(id)
                    .await
                    .map_err(|e| InboxError::lookup(e, id))?;
                Ok(message.into())
            }
            MessageSource::Internal => {
                let message = self.load_accessible(auth, id).await?;
                let in_inbox_scope =
                    predicate(auth.identity(), InboxFilter::Inbox).matches(&message);
                if message.is_read || !in_inbox_scope {
                    return Ok(message.into());
                }
                self.ensure_fresh(auth)?;
                let update = FlagUpdateBuilder::new().is_read(true).build();
                self.persist(id, &update).await
            }
        }
    }

    /// Set explicit flag targets on one internal message. Idempotent.
    ///
    /// # Errors
    ///
    /// `InvalidOperation` for external or out-of-scope messages, `NotFound`,
    /// `StaleAuthorization`, or `StoreUnavailable`.
    pub async fn set_flags(
        &self,
        auth: &Authorized,
        id: &str,
        update: FlagUpdate,
    ) -> Result<MessageView, InboxError> {
        Self::require_internal(id)?;
        self.ensure_fresh(auth)?;
        let current = self.load_accessible(auth, id).await?;
        if update.is_empty() {
            return Ok(current.into());
        }
        self.persist(id, &update).await
    }

    /// # Errors
    ///
    /// Same as [`Self::set_flags`].
    pub async fn set_read(
        &self,
        auth: &Authorized,
        id: &str,
        is_read: bool,
    ) -> Result<MessageView, InboxError> {
        self.set_flags(auth, id, FlagUpdateBuilder::new().is_read(is_read).build())
            .await
    }

    /// # Errors
    ///
    /// Same as [`Self::set_flags`].
    pub async fn set_starred(
        &self,
        auth: &Authorized,
        id: &str,
        is_starred: bool,
    ) -> Result<MessageView, InboxError> {
        self.set_flags(
            auth,
            id,
            FlagUpdateBuilder::new().is_starred(is_starred).build(),
        )
        .await
    }

    /// Flip `is_read` relative to the persisted value, not a cached one.
    ///
    /// # Errors
    ///
    /// Same as [`Self::set_flags`].
    pub async fn toggle_read(&self, auth: &Authorized, id: &str) -> Result<MessageView, InboxError> {
        Self::require_internal(id)?;
        self.ensure_fresh(auth)?;
        let current = self.load_accessible(auth, id).await?;
        let update = FlagUpdateBuilder::new().is_read(!current.is_read).build();
        self.persist(id, &update).await
    }

    /// Flip `is_starred` relative to the persisted value.
    ///
    /// # Errors
    ///
    /// Same as [`Self::set_flags`].
    pub async fn toggle_star(&self, auth: &Authorized, id: &str) -> Result<MessageView, InboxError> {
        Self::require_internal(id)?;
        self.ensure_fresh(auth)?;
        let current = self.load_accessible(auth, id).await?;
        let update = FlagUpdateBuilder::new()
            .is_starred(!current.is_starred)
            .build();
        self.persist(id, &update).await
    }

    /// Apply one update to several internal messages, all or nothing: any
    /// external, unknown, or out-of-scope id rejects the whole batch before
    /// anything is written.
    ///
    /// # Errors
    ///
    /// Same as [`Self::set_flags`].
    pub async fn set_flags_many(
        &self,
        auth: &Authorized,
        ids: &[String],
        update: FlagUpdate,
    ) -> Result<u64, InboxError> {
        for id in ids {
            Self::require_internal(id)?;
        }
        if ids.is_empty() || update.is_empty() {
            return Ok(0);
        }
        self.ensure_fresh(auth)?;
        for id in ids {
            self.load_accessible(auth, id).await?;
        }
        let updated = self.store.update_flags_many(ids, &update).await?;
        tracing::debug!(email = %auth.identity().email, count = updated, ?update, "bulk flag update");
        Ok(updated)
    }

    /// Send an internal message as the authorized principal.
    ///
    /// # Errors
    ///
    /// `Validation` for a blank body or receiver, `StaleAuthorization`, or
    /// `StoreUnavailable`.
    pub async fn send(&self, auth: &Authorized, new: &NewMessage) -> Result<MessageView, InboxError> {
        new.validate()?;
        self.ensure_fresh(auth)?;
        let created = self.store.create_internal(auth.identity(), new).await?;
        tracing::info!(id = %created.id, sender = %created.sender_email, "message sent");
        Ok(created.into())
    }

    /// Every contact-form submission, newest first. Admin only.
    ///
    /// # Errors
    ///
    /// `InvalidOperation` for non-admins, or `StoreUnavailable`.
    pub async fn contact_submissions(
        &self,
        auth: &Authorized,
    ) -> Result<Vec<MessageView>, InboxError> {
        if !auth.identity().is_admin() {
            return Err(InboxError::InvalidOperation(
                "contact-form submissions are visible to admins only".into(),
            ));
        }
        let external = self.store.list_external(self.settings.limit).await?;
        Ok(merge(
            Vec::new(),
            external.into_iter().map(MessageView::from).collect(),
            MergeOrder::Grouped,
        ))
    }

    /// Public contact form. Needs no authorization.
    ///
    /// # Errors
    ///
    /// `Validation` unless name, email, and message are present, or
    /// `StoreUnavailable`.
    pub async fn submit_contact_form(
        &self,
        submission: &ContactSubmission,
    ) -> Result<MessageView, InboxError> {
        submission.validate()?;
        Ok(self.store.submit_external(submission).await?.into())
    }

    // --- private helpers ---

    fn source_of(id: &str) -> Result<MessageSource, InboxError> {
        MessageSource::of_id(id).ok_or_else(|| InboxError::NotFound { id: id.to_string() })
    }

    fn require_internal(id: &str) -> Result<(), InboxError> {
        match Self::source_of(id)? {
            MessageSource::Internal => Ok(()),
            MessageSource::External => Err(InboxError::InvalidOperation(format!(
                "{id} is a contact-form submission and has no read/starred state"
            ))),
        }
    }

    fn ensure_fresh(&self, auth: &Authorized) -> Result<(), InboxError> {
        if auth.is_fresh(self.settings.mutation_max_age) {
            return Ok(());
        }
        Err(InboxError::StaleAuthorization {
            age_secs: auth.age().num_seconds(),
            max_secs: self.settings.mutation_max_age.as_secs(),
        })
    }

    async fn load_accessible(
        &self,
        auth: &Authorized,
        id: &str,
    ) -> Result<InternalMessage, InboxError> {
        let message = self
            .store
            .get_internal(id)
            .await
            .map_err(|e| InboxError::lookup(e, id))?;
        if !can_access(auth.identity(), &message) {
            return Err(InboxError::InvalidOperation(format!(
                "{id} is outside {}'s visibility scope",
                auth.identity().email
            )));
        }
        Ok(message)
    }

    async fn persist(&self, id: &str, update: &FlagUpdate) -> Result<MessageView, InboxError> {
        let updated = self
            .store
            .update_flags(id, update)
            .await
            .map_err(|e| InboxError::lookup(e, id))?;
        tracing::debug!(%id, ?update, "flags persisted");
        Ok(updated.into())
    }
}
