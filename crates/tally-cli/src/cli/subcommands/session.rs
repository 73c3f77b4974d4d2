use clap::Subcommand;

/// Review session commands.
#[derive(Clone, Debug, Subcommand)]
pub enum SessionCommands {
    /// Start or resume a review session on an item.
    Start {
        /// Item under review.
        item: String,
        /// Reviewer (defaults to --as).
        #[arg(long)]
        reviewer: Option<String>,
        /// Advisory reviewer area tag.
        #[arg(long)]
        area: Option<String>,
    },
    /// Mark a session completed.
    Complete { id: String },
    /// Get a session by ID.
    Get { id: String },
    /// List sessions for an item or a reviewer.
    List {
        #[arg(long, conflicts_with = "reviewer", required_unless_present = "reviewer")]
        item: Option<String>,
        #[arg(long)]
        reviewer: Option<String>,
    },
}
