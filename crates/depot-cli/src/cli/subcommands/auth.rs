use clap::Subcommand;

/// Authentication commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AuthCommands {
    /// Start a session for an email and resolve its role.
    Login {
        #[arg(long)]
        email: String,
    },
    /// End the session and drop its cached role.
    Logout,
    /// Show the current identity.
    Whoami {
        /// Resolve against the store instead of the role cache.
        #[arg(long)]
        fresh: bool,
    },
}
