use tally_core::enums::TargetType;

use crate::cli::GlobalFlags;
use crate::commands::shared::parse::parse_fields;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    kind: &str,
    title: &str,
    parent: Option<&str>,
    fields: Option<&str>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let kind: TargetType = kind.parse()?;
    let fields = fields.map(parse_fields).transpose()?.unwrap_or_default();
    let item = ctx.service.create_item(kind, title, parent, fields).await?;
    output(&item, flags.format)
}
