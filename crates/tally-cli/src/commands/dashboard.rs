use crate::cli::GlobalFlags;
use crate::cli::root_commands::DashboardArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `tally dashboard`. Admins only.
pub async fn handle(
    args: &DashboardArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let actor = flags.require_actor()?;
    ctx.require_admin(actor, "view the review dashboard")?;

    let dashboard = ctx.service.build_dashboard(&args.items).await?;
    output(&dashboard, flags.format)
}
