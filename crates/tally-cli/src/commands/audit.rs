use tally_core::enums::{AuditAction, EntityType};
use tally_db::repos::audit::AuditFilter;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AuditArgs;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

/// Handle `tally audit`.
pub async fn handle(args: &AuditArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let filter = AuditFilter {
        entity_type: args
            .entity_type
            .as_deref()
            .map(|raw| parse_enum::<EntityType>(raw, "entity type"))
            .transpose()?,
        entity_id: args.entity_id.clone(),
        action: args
            .action
            .as_deref()
            .map(|raw| parse_enum::<AuditAction>(raw, "action"))
            .transpose()?,
        session_id: args.session.clone(),
        limit: Some(flags.limit.unwrap_or(ctx.config.general.default_limit)),
    };

    let entries = ctx.service.query_audit(&filter).await?;
    output(&entries, flags.format)
}
