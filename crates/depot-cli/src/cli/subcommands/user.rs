use clap::Subcommand;

/// Moderation commands. Tables: driver, admin, coordinator.
#[derive(Clone, Debug, Subcommand)]
pub enum UserCommands {
    /// Ban a principal.
    Ban {
        #[arg(long)]
        table: String,
        #[arg(long)]
        email: String,
    },
    /// Lift a ban.
    Unban {
        #[arg(long)]
        table: String,
        #[arg(long)]
        email: String,
    },
}
