mod add;
mod get;
mod list;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ItemCommands;
use crate::context::AppContext;

/// Handle `tally item`.
pub async fn handle(action: &ItemCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        ItemCommands::Add {
            kind,
            title,
            parent,
            fields,
        } => add::run(kind, title, parent.as_deref(), fields.as_deref(), ctx, flags).await,
        ItemCommands::Get { id } => get::run(id, ctx, flags).await,
        ItemCommands::List { kind } => list::run(kind.as_deref(), ctx, flags).await,
    }
}
