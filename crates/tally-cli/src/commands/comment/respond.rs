use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    id: &str,
    response: &str,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let actor = flags.require_actor()?;
    ctx.require_admin(actor, "respond to comments")?;

    let comment = ctx.service.admin_respond(id, response).await?;
    tracing::info!(comment_id = id, actor, "comment answered");
    output(&comment, flags.format)
}
