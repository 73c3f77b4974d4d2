use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    session: &str,
    item: &str,
    content: &str,
    sub_item: Option<&str>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let comment = ctx
        .service
        .add_comment(session, item, content, sub_item)
        .await?;
    output(&comment, flags.format)
}
