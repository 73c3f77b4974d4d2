use schemars::schema_for;
use tally_core::dashboard::DashboardData;
use tally_core::entities::{AuditEntry, CommentView, FieldFeedback, Item, ReviewComment, ReviewSession};
use tally_core::quorum::{ProgressStats, QuorumStatus};
use tally_core::suggestion::{ApplicationResult, Suggestion};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

/// Type names accepted by `tally schema`.
pub const SCHEMA_TYPES: &[&str] = &[
    "session",
    "feedback",
    "comment",
    "comment-view",
    "item",
    "audit",
    "suggestion",
    "application-result",
    "quorum",
    "progress",
    "dashboard",
];

/// Handle `tally schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let schema = schema_value(&args.type_name)?;
    output(&schema, flags.format)
}

fn schema_value(type_name: &str) -> anyhow::Result<serde_json::Value> {
    let schema = match type_name.trim().to_ascii_lowercase().replace('_', "-").as_str() {
        "session" => schema_for!(ReviewSession),
        "feedback" => schema_for!(FieldFeedback),
        "comment" => schema_for!(ReviewComment),
        "comment-view" => schema_for!(CommentView),
        "item" => schema_for!(Item),
        "audit" => schema_for!(AuditEntry),
        "suggestion" => schema_for!(Suggestion),
        "application-result" => schema_for!(ApplicationResult),
        "quorum" => schema_for!(QuorumStatus),
        "progress" => schema_for!(ProgressStats),
        "dashboard" => schema_for!(DashboardData),
        other => anyhow::bail!(
            "unknown schema type '{other}' (expected one of: {})",
            SCHEMA_TYPES.join(", ")
        ),
    };
    Ok(serde_json::to_value(schema)?)
}
