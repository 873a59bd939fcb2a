use clap::{Subcommand, ValueEnum};

/// Inbox commands. Filters: inbox, sent, starred, important, snoozed, drafts,
/// spam, junk, trash.
#[derive(Clone, Debug, Subcommand)]
pub enum InboxCommands {
    /// List messages on a tab.
    List {
        #[arg(long, default_value = "inbox")]
        filter: String,
        /// Case-insensitive match on sender, receiver, subject, body.
        #[arg(long)]
        search: Option<String>,
    },
    /// Show a message, marking it read if it is unread in your inbox.
    Open { id: String },
    /// Star a message (or unstar with --off).
    Star {
        id: String,
        #[arg(long)]
        off: bool,
    },
    /// Mark a message read (or unread with --unread).
    Read {
        id: String,
        #[arg(long)]
        unread: bool,
    },
    /// Flip one flag relative to its stored value.
    Toggle {
        id: String,
        #[arg(long, value_enum, default_value_t = ToggleField::Star)]
        field: ToggleField,
    },
    /// Mark every message on a tab read, or unread if all already are.
    MarkAll {
        #[arg(long, default_value = "inbox")]
        filter: String,
    },
    /// Send a message as the signed-in principal.
    Send {
        #[arg(long)]
        to: String,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        body: String,
        /// Display name of the receiver.
        #[arg(long)]
        to_name: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ToggleField {
    Star,
    Read,
}
