use chrono::{DateTime, Utc};
use depot_auth::resolver::IntegrityWarning;
use depot_auth::{AuthSource, Authorized};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuthCommands;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct IdentityResponse {
    email: String,
    role: String,
    identity_id: String,
    /// `fresh` when resolved against the store, `cached` otherwise.
    source: &'static str,
    verified_at: DateTime<Utc>,
    revalidate_after_secs: u64,
    warning: Option<IntegrityWarning>,
}

impl IdentityResponse {
    fn new(auth: &Authorized, ctx: &AppContext) -> Self {
        let identity = auth.identity();
        Self {
            email: identity.email.clone(),
            role: identity.role.label(),
            identity_id: identity.id.clone(),
            source: match auth.source() {
                AuthSource::Fresh => "fresh",
                AuthSource::Cached => "cached",
            },
            verified_at: auth.verified_at(),
            revalidate_after_secs: ctx.config.session.revalidate_after_secs,
            warning: auth.warning().cloned(),
        }
    }
}

#[derive(Serialize)]
struct LogoutResponse {
    signed_out: bool,
}

/// Handle `depot auth <subcommand>`.
pub async fn handle(action: &AuthCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        AuthCommands::Login { email } => {
            let auth = ctx.gate.sign_in(email).await?;
            if let Some(warning) = auth.warning() {
                tracing::warn!(email = %warning.email, tables = ?warning.tables, "identity found in several tables");
            }
            output(&IdentityResponse::new(&auth, ctx), flags.format)
        }
        AuthCommands::Logout => {
            ctx.gate.sign_out()?;
            output(&LogoutResponse { signed_out: true }, flags.format)
        }
        AuthCommands::Whoami { fresh } => {
            let auth = if *fresh {
                ctx.gate.authorize_fresh().await?
            } else {
                ctx.gate.authorize().await?
            };
            output(&IdentityResponse::new(&auth, ctx), flags.format)
        }
    }
}
