pub mod auth;
pub mod contact;
pub mod inbox;
pub mod user;

pub use auth::AuthCommands;
pub use contact::ContactCommands;
pub use inbox::{InboxCommands, ToggleField};
pub use user::UserCommands;
