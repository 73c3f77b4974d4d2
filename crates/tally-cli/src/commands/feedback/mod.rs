mod delete;
mod list;
mod upsert;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::FeedbackCommands;
use crate::context::AppContext;

/// Handle `tally feedback`.
pub async fn handle(
    action: &FeedbackCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        FeedbackCommands::Upsert {
            session,
            field,
            proposed,
            current,
            comment,
            area_specific,
        } => {
            upsert::run(
                &upsert::Params {
                    session,
                    field,
                    proposed,
                    current: current.as_deref(),
                    comment: comment.as_deref(),
                    area_specific: *area_specific,
                },
                ctx,
                flags,
            )
            .await
        }
        FeedbackCommands::List { session, item } => {
            list::run(session.as_deref(), item.as_deref(), ctx, flags).await
        }
        FeedbackCommands::Delete { id } => delete::run(id, ctx, flags).await,
    }
}
