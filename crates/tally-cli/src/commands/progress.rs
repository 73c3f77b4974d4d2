use crate::cli::GlobalFlags;
use crate::cli::root_commands::ProgressArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `tally progress`.
pub async fn handle(
    args: &ProgressArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let reviewer = args.reviewer.as_deref().or(flags.actor.as_deref());
    let stats = ctx
        .service
        .compute_global_progress(&args.items, reviewer, None)
        .await?;
    output(&stats, flags.format)
}
