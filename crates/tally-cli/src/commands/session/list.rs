use crate::cli::GlobalFlags;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    item: Option<&str>,
    reviewer: Option<&str>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let mut sessions = match (item, reviewer) {
        (Some(item), _) => ctx.service.list_sessions_by_item(item).await?,
        (None, Some(reviewer)) => ctx.service.list_sessions_by_reviewer(reviewer).await?,
        (None, None) => anyhow::bail!("pass --item or --reviewer"),
    };
    sessions.truncate(effective_limit(
        flags.limit,
        ctx.config.general.default_limit,
    ));
    output(&sessions, flags.format)
}
