//! # depot-inbox
//!
//! Visibility-scoped message aggregation for Depot.
//!
//! [`Inbox`] merges the internal `contact` store and, for admins on the
//! Important tab, the public contact-form log into one newest-first list of
//! [`MessageView`](depot_core::entities::MessageView). It also applies
//! read/starred mutations, which are rejected for contact-form items.
//! [`InboxView`] holds one tab's items in memory, discarding superseded
//! fetches and updating only from persisted state.
//!
//! Every operation takes an [`Authorized`](depot_auth::Authorized), so a
//! predicate can never be evaluated for an unresolved principal. Mutations
//! additionally require the authorization to be younger than
//! [`InboxSettings::mutation_max_age`].

pub mod error;
pub mod inbox;
pub mod settings;
pub mod store;
pub mod view;

pub use error::InboxError;
pub use inbox::{Inbox, merge};
pub use settings::InboxSettings;
pub use store::{ContactFormStore, MessageStore};
pub use view::{FetchTicket, InboxView};
