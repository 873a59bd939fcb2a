//! Entity structs for all Depot domain objects.
//!
//! Each stored entity maps to a table in the libSQL database. All structs
//! derive `Serialize`, `Deserialize`, and `JsonSchema`.

mod identity;
mod message;

pub use identity::{Identity, IdentityRecord, Role};
pub use message::{
    ContactSubmission, DEFAULT_EXTERNAL_SUBJECT, EXTERNAL_RECEIVER, ExternalMessage,
    InternalMessage, MessageView, NewMessage, UNKNOWN_SENDER,
};
