use crate::cli::GlobalFlags;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    session: Option<&str>,
    item: Option<&str>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let mut feedback = match (session, item) {
        (Some(session), _) => ctx.service.list_feedback_by_session(session).await?,
        (None, Some(item)) => ctx.service.list_feedback_by_item(item).await?,
        (None, None) => anyhow::bail!("pass --session or --item"),
    };
    feedback.truncate(effective_limit(
        flags.limit,
        ctx.config.general.default_limit,
    ));
    output(&feedback, flags.format)
}
