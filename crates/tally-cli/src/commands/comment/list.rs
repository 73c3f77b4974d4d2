use tally_core::enums::CommentStatus;

use crate::cli::GlobalFlags;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    item: Option<&str>,
    session: Option<&str>,
    status: Option<&str>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let status = status
        .map(|raw| parse_enum::<CommentStatus>(raw, "status"))
        .transpose()?;
    let limit = effective_limit(flags.limit, ctx.config.general.default_limit);

    match (item, session) {
        (Some(item), _) => {
            let views: Vec<_> = ctx
                .service
                .list_comments_by_item(item)
                .await?
                .into_iter()
                .filter(|view| status.is_none_or(|s| view.comment.status == s))
                .take(limit)
                .collect();
            output(&views, flags.format)
        }
        (None, Some(session)) => {
            let comments: Vec<_> = ctx
                .service
                .list_comments_by_session(session)
                .await?
                .into_iter()
                .filter(|comment| status.is_none_or(|s| comment.status == s))
                .take(limit)
                .collect();
            output(&comments, flags.format)
        }
        (None, None) => anyhow::bail!("pass --item or --session"),
    }
}
