mod complete;
mod get;
mod list;
mod start;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::SessionCommands;
use crate::context::AppContext;

/// Handle `tally session`.
pub async fn handle(
    action: &SessionCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        SessionCommands::Start {
            item,
            reviewer,
            area,
        } => start::run(item, reviewer.as_deref(), area.as_deref(), ctx, flags).await,
        SessionCommands::Complete { id } => complete::run(id, ctx, flags).await,
        SessionCommands::Get { id } => get::run(id, ctx, flags).await,
        SessionCommands::List { item, reviewer } => {
            list::run(item.as_deref(), reviewer.as_deref(), ctx, flags).await
        }
    }
}
