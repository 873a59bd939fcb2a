use clap::{Args, Subcommand};

use crate::cli::subcommands::{AuthCommands, ContactCommands, InboxCommands, UserCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Sign in, sign out, and inspect the resolved identity.
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
    /// Role-scoped inbox.
    Inbox {
        #[command(subcommand)]
        action: InboxCommands,
    },
    /// Public contact form.
    Contact {
        #[command(subcommand)]
        action: ContactCommands,
    },
    /// Admin moderation.
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
    /// Print the JSON Schema of a payload type.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// One of: message-view, new-message, contact-submission, identity, predicate
    pub type_name: String,
}
