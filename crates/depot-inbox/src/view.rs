//! In-memory inbox view.
//!
//! Results from a fetch are applied only if no navigation or newer fetch
//! happened since it started. State changes are written to the store first and
//! the view is updated from the persisted row, so a failed write leaves the
//! view as it was.

use depot_auth::Authorized;
use depot_core::entities::MessageView;
use depot_core::enums::{InboxFilter, MessageSource};
use depot_db::updates::message::FlagUpdateBuilder;

use crate::error::InboxError;
use crate::inbox::Inbox;
use crate::store::{ContactFormStore, MessageStore};

/// Identifies one fetch. Completing with a superseded ticket is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    filter: InboxFilter,
    generation: u64,
}

impl FetchTicket {
    #[must_use]
    pub const fn filter(&self) -> InboxFilter {
        self.filter
    }
}

#[derive(Debug, Clone, Default)]
pub struct InboxView {
    filter: InboxFilter,
    generation: u64,
    items: Vec<MessageView>,
}

impl InboxView {
    #[must_use]
    pub fn new(filter: InboxFilter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn filter(&self) -> InboxFilter {
        self.filter
    }

    #[must_use]
    pub fn items(&self) -> &[MessageView] {
        &self.items
    }

    /// Switch tabs. Clears the items and supersedes any in-flight fetch.
    pub fn navigate(&mut self, filter: InboxFilter) -> FetchTicket {
        self.filter = filter;
        self.items.clear();
        self.begin_fetch()
    }

    /// Start a fetch for the current tab, superseding earlier ones.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        FetchTicket {
            filter: self.filter,
            generation: self.generation,
        }
    }

    /// Apply a fetch result. Returns `false` and discards `items` when the
    /// ticket has been superseded.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, items: Vec<MessageView>) -> bool {
        if ticket.generation != self.generation || ticket.filter != self.filter {
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding superseded fetch"
            );
            return false;
        }
        self.items = items;
        true
    }

    /// Re-query the current tab and apply the result.
    ///
    /// # Errors
    ///
    /// Propagates the fetch error; the view keeps its previous items.
    pub async fn refresh<S: MessageStore + ContactFormStore>(
        &mut self,
        inbox: &Inbox<S>,
        auth: &Authorized,
    ) -> Result<bool, InboxError> {
        let ticket = self.begin_fetch();
        let items = inbox.fetch(auth, ticket.filter()).await?;
        Ok(self.complete_fetch(ticket, items))
    }

    /// Replace the item with the same id by its persisted state.
    pub fn apply(&mut self, updated: MessageView) {
        if let Some(slot) = self.items.iter_mut().find(|m| m.id == updated.id) {
            *slot = updated;
        }
    }

    /// Open a message (marking it read when applicable) and update the view.
    ///
    /// # Errors
    ///
    /// See [`Inbox::open`]. The view is unchanged on error.
    pub async fn open<S: MessageStore + ContactFormStore>(
        &mut self,
        inbox: &Inbox<S>,
        auth: &Authorized,
        id: &str,
    ) -> Result<MessageView, InboxError> {
        let opened = inbox.open(auth, id).await?;
        self.apply(opened.clone());
        Ok(opened)
    }

    /// # Errors
    ///
    /// See [`Inbox::toggle_star`]. The view is unchanged on error.
    pub async fn toggle_star<S: MessageStore + ContactFormStore>(
        &mut self,
        inbox: &Inbox<S>,
        auth: &Authorized,
        id: &str,
    ) -> Result<MessageView, InboxError> {
        let updated = inbox.toggle_star(auth, id).await?;
        self.apply(updated.clone());
        Ok(updated)
    }

    /// # Errors
    ///
    /// See [`Inbox::toggle_read`]. The view is unchanged on error.
    pub async fn toggle_read<S: MessageStore + ContactFormStore>(
        &mut self,
        inbox: &Inbox<S>,
        auth: &Authorized,
        id: &str,
    ) -> Result<MessageView, InboxError> {
        let updated = inbox.toggle_read(auth, id).await?;
        self.apply(updated.clone());
        Ok(updated)
    }

    /// Mark every internal item read, or unread if all already are.
    ///
    /// Returns the target state, or `None` when the view holds no internal
    /// items.
    ///
    /// # Errors
    ///
    /// See [`Inbox::set_flags_many`]. The view is unchanged on error.
    pub async fn toggle_all_read<S: MessageStore + ContactFormStore>(
        &mut self,
        inbox: &Inbox<S>,
        auth: &Authorized,
    ) -> Result<Option<bool>, InboxError> {
        let internal: Vec<&MessageView> = self
            .items
            .iter()
            .filter(|m| m.source == MessageSource::Internal)
            .collect();
        if internal.is_empty() {
            return Ok(None);
        }
        let target = !internal.iter().all(|m| m.is_read);
        let ids: Vec<String> = internal.iter().map(|m| m.id.clone()).collect();

        inbox
            .set_flags_many(auth, &ids, FlagUpdateBuilder::new().is_read(target).build())
            .await?;

        for item in self
            .items
            .iter_mut()
            .filter(|m| m.source == MessageSource::Internal)
        {
            item.is_read = target;
        }
        Ok(Some(target))
    }

    /// Items whose sender, receiver, subject, or body contains `query`,
    /// ignoring case. A blank query matches everything.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&MessageView> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.items.iter().collect();
        }
        self.items
            .iter()
            .filter(|m| m.matches_search(&needle))
            .collect()
    }
}
