use tally_core::enums::TargetType;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(kind: Option<&str>, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let kind = kind.map(str::parse::<TargetType>).transpose()?;
    let limit = flags.limit.unwrap_or(ctx.config.general.default_limit);
    let items = ctx.service.list_items(kind, limit).await?;
    output(&items, flags.format)
}
