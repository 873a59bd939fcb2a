use clap::Subcommand;

/// Contact-form commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ContactCommands {
    /// Submit the public contact form. No sign-in needed.
    Submit {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        message: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        subject: Option<String>,
    },
    /// List submissions (admins only).
    List,
}
