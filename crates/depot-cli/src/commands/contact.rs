use depot_core::entities::ContactSubmission;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ContactCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `depot contact <subcommand>`.
pub async fn handle(action: &ContactCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        ContactCommands::Submit {
            name,
            email,
            message,
            phone,
            company,
            subject,
        } => {
            let submission = ContactSubmission {
                name: name.clone(),
                email: email.clone(),
                message: message.clone(),
                phone: phone.clone(),
                company: company.clone(),
                subject: subject.clone(),
            };
            output(&ctx.inbox.submit_contact_form(&submission).await?, flags.format)
        }
        ContactCommands::List => {
            let auth = ctx.gate.authorize().await?;
            output(&ctx.inbox.contact_submissions(&auth).await?, flags.format)
        }
    }
}
