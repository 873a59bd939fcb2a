use depot_core::entities::{MessageView, NewMessage};
use depot_core::enums::InboxFilter;
use depot_inbox::{InboxError, InboxView};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{InboxCommands, ToggleField};
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct MarkAllResponse {
    filter: InboxFilter,
    /// `None` when the tab held no internal messages.
    is_read: Option<bool>,
    messages: usize,
}

/// Handle `depot inbox <subcommand>`.
///
/// Listing accepts a cached authorization. Every write re-resolves the
/// principal first so a ban applied since the last resolution takes effect.
pub async fn handle(action: &InboxCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        InboxCommands::List { filter, search } => {
            let filter: InboxFilter = parse_enum(filter, "filter")?;
            let auth = ctx.gate.authorize().await?;
            let mut view = InboxView::new(filter);
            view.refresh(&ctx.inbox, &auth).await?;
            let hits = view.search(search.as_deref().unwrap_or_default());
            output(&hits, flags.format)
        }
        InboxCommands::Open { id } => output(&open(ctx, id).await?, flags.format),
        InboxCommands::Star { id, off } => {
            let auth = ctx.gate.authorize_fresh().await?;
            output(&ctx.inbox.set_starred(&auth, id, !off).await?, flags.format)
        }
        InboxCommands::Read { id, unread } => {
            let auth = ctx.gate.authorize_fresh().await?;
            output(&ctx.inbox.set_read(&auth, id, !unread).await?, flags.format)
        }
        InboxCommands::Toggle { id, field } => {
            let auth = ctx.gate.authorize_fresh().await?;
            let updated = match field {
                ToggleField::Star => ctx.inbox.toggle_star(&auth, id).await?,
                ToggleField::Read => ctx.inbox.toggle_read(&auth, id).await?,
            };
            output(&updated, flags.format)
        }
        InboxCommands::MarkAll { filter } => {
            let filter: InboxFilter = parse_enum(filter, "filter")?;
            let auth = ctx.gate.authorize_fresh().await?;
            let mut view = InboxView::new(filter);
            view.refresh(&ctx.inbox, &auth).await?;
            let is_read = view.toggle_all_read(&ctx.inbox, &auth).await?;
            output(
                &MarkAllResponse {
                    filter,
                    is_read,
                    messages: view.items().len(),
                },
                flags.format,
            )
        }
        InboxCommands::Send {
            to,
            subject,
            body,
            to_name,
        } => {
            let auth = ctx.gate.authorize_fresh().await?;
            let new = NewMessage {
                receiver_email: to.clone(),
                receiver_display: to_name.clone(),
                subject: subject.clone(),
                body: body.clone(),
                ..NewMessage::default()
            };
            output(&ctx.inbox.send(&auth, &new).await?, flags.format)
        }
    }
}

/// Open with the cached authorization; re-resolve once if marking the message
/// read needs a newer one.
async fn open(ctx: &AppContext, id: &str) -> anyhow::Result<MessageView> {
    let auth = ctx.gate.authorize().await?;
    match ctx.inbox.open(&auth, id).await {
        Err(InboxError::StaleAuthorization { .. }) => {
            tracing::debug!(%id, "re-validating before mark-read");
            let fresh = ctx.gate.authorize_fresh().await?;
            Ok(ctx.inbox.open(&fresh, id).await?)
        }
        other => Ok(other?),
    }
}
