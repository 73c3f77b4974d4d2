use tally_core::value::FieldValue;
use tally_db::repos::feedback::FeedbackDraft;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub struct Params<'a> {
    pub session: &'a str,
    pub field: &'a str,
    pub proposed: &'a str,
    pub current: Option<&'a str>,
    pub comment: Option<&'a str>,
    pub area_specific: bool,
}

pub async fn run(params: &Params<'_>, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut draft = FeedbackDraft::new(
        params.session,
        params.field,
        FieldValue::parse_arg(params.proposed),
    )
    .area_specific(params.area_specific);
    if let Some(current) = params.current {
        draft = draft.current(FieldValue::parse_arg(current));
    }
    if let Some(comment) = params.comment {
        draft = draft.comment(comment);
    }

    let feedback = ctx.service.upsert_feedback(&draft).await?;
    output(&feedback, flags.format)
}
