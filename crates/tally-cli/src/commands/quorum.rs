use crate::cli::GlobalFlags;
use crate::cli::root_commands::QuorumArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `tally quorum`.
///
/// `--threshold` is already folded into the service policy at startup.
pub async fn handle(args: &QuorumArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let status = ctx.service.compute_item_status(&args.item, None).await?;
    output(&status, flags.format)
}
