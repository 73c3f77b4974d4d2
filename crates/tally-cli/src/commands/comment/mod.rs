mod add;
mod delete;
mod list;
mod resolve;
mod respond;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CommentCommands;
use crate::context::AppContext;

/// Handle `tally comment`.
pub async fn handle(
    action: &CommentCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        CommentCommands::Add {
            session,
            item,
            content,
            sub_item,
        } => add::run(session, item, content, sub_item.as_deref(), ctx, flags).await,
        CommentCommands::Respond { id, response } => respond::run(id, response, ctx, flags).await,
        CommentCommands::Resolve { id } => resolve::run(id, ctx, flags).await,
        CommentCommands::List {
            item,
            session,
            status,
        } => list::run(item.as_deref(), session.as_deref(), status.as_deref(), ctx, flags).await,
        CommentCommands::Delete { id } => delete::run(id, ctx, flags).await,
    }
}
