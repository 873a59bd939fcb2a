use anyhow::bail;
use depot_core::entities::{ContactSubmission, Identity, MessageView, NewMessage};
use depot_core::policy::QueryPredicate;
use schemars::schema_for;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

/// Handle `depot schema <type>`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let schema = match args.type_name.as_str() {
        "message-view" => schema_for!(MessageView),
        "new-message" => schema_for!(NewMessage),
        "contact-submission" => schema_for!(ContactSubmission),
        "identity" => schema_for!(Identity),
        "predicate" => schema_for!(QueryPredicate),
        other => bail!(
            "unknown schema type '{other}' (expected message-view, new-message, contact-submission, identity, predicate)"
        ),
    };
    output(&schema, flags.format)
}
