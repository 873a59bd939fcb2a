use depot_core::enums::IdentityTable;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::UserCommands;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct BanResponse {
    table: IdentityTable,
    email: String,
    banned: bool,
    changed: bool,
}

/// Handle `depot user <subcommand>`.
pub async fn handle(action: &UserCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let (table, email, banned) = match action {
        UserCommands::Ban { table, email } => (table, email, true),
        UserCommands::Unban { table, email } => (table, email, false),
    };
    let table: IdentityTable = parse_enum(table, "table")?;

    let actor = ctx.gate.authorize_fresh().await?;
    let changed = ctx.moderator.set_ban(&actor, table, email, banned).await?;
    if !changed {
        tracing::warn!(%table, %email, "no matching identity record");
    }

    output(
        &BanResponse {
            table,
            email: email.clone(),
            banned,
            changed,
        },
        flags.format,
    )
}
