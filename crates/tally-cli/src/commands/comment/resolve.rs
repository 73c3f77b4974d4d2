use tally_core::auth::Authorizer;
use tally_core::errors::CoreError;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Admins may resolve any comment; reviewers only their own.
pub async fn run(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let actor = flags.require_actor()?;
    if !ctx.authorizer.is_admin(actor) {
        let comment = ctx.service.get_comment(id).await?;
        let session = ctx.service.get_session(&comment.review_session_id).await?;
        if session.reviewer_id != actor {
            return Err(CoreError::Unauthorized {
                actor: actor.to_string(),
                action: format!("resolve comment {id}"),
            }
            .into());
        }
    }

    let comment = ctx.service.resolve_comment(id).await?;
    tracing::info!(comment_id = id, actor, "comment resolved");
    output(&comment, flags.format)
}
