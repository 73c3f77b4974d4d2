use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    item: &str,
    reviewer: Option<&str>,
    area: Option<&str>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let reviewer = match reviewer {
        Some(reviewer) => reviewer,
        None => flags.require_actor()?,
    };
    let session = ctx
        .service
        .start_or_resume_session(item, reviewer, area)
        .await?;
    output(&session, flags.format)
}
