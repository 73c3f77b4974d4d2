use clap::{Args, Subcommand};

use crate::cli::subcommands::{CommentCommands, FeedbackCommands, ItemCommands, SessionCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Projects and tasks under review.
    Item {
        #[command(subcommand)]
        action: ItemCommands,
    },
    /// Review sessions (one per item and reviewer).
    Session {
        #[command(subcommand)]
        action: SessionCommands,
    },
    /// Field-level change proposals.
    Feedback {
        #[command(subcommand)]
        action: FeedbackCommands,
    },
    /// Review comments and admin responses.
    Comment {
        #[command(subcommand)]
        action: CommentCommands,
    },
    /// Quorum status for one item.
    Quorum(QuorumArgs),
    /// Review coverage across items.
    Progress(ProgressArgs),
    /// Apply suggestions to items, reporting each outcome.
    Apply(ApplyArgs),
    /// Admin dashboard for a set of items.
    Dashboard(DashboardArgs),
    /// Query the audit trail.
    Audit(AuditArgs),
    /// Dump JSON schema for a report or entity type.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct QuorumArgs {
    /// Item ID.
    pub item: String,
}

#[derive(Clone, Debug, Args)]
pub struct ProgressArgs {
    /// Candidate item IDs.
    #[arg(required = true)]
    pub items: Vec<String>,
    /// Include this reviewer's own activity.
    #[arg(long)]
    pub reviewer: Option<String>,
}

#[derive(Clone, Debug, Args)]
#[group(required = true, multiple = false)]
pub struct ApplyArgs {
    /// JSON file holding an array of suggestions (`-` for stdin).
    #[arg(long)]
    pub file: Option<String>,
    /// Build suggestions from all feedback recorded for this item.
    #[arg(long)]
    pub from_feedback: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct DashboardArgs {
    /// Item IDs to report on.
    #[arg(required = true)]
    pub items: Vec<String>,
}

#[derive(Clone, Debug, Args)]
pub struct AuditArgs {
    #[arg(long)]
    pub entity_type: Option<String>,
    #[arg(long)]
    pub entity_id: Option<String>,
    #[arg(long)]
    pub action: Option<String>,
    #[arg(long)]
    pub session: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// One of: session, feedback, comment, comment-view, item, audit,
    /// suggestion, application-result, quorum, progress, dashboard.
    pub type_name: String,
}
