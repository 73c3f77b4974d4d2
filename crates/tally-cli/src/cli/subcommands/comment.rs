use clap::Subcommand;

/// Review comment commands.
#[derive(Clone, Debug, Subcommand)]
pub enum CommentCommands {
    /// Add a comment to an item within a session.
    Add {
        session: String,
        item: String,
        content: String,
        /// Sub-item (e.g. task) the comment is about.
        #[arg(long)]
        sub_item: Option<String>,
    },
    /// Answer a comment (admins only).
    Respond { id: String, response: String },
    /// Resolve a comment (admins or the commenting reviewer).
    Resolve { id: String },
    /// List comments for an item or a session.
    List {
        #[arg(long, conflicts_with = "session", required_unless_present = "session")]
        item: Option<String>,
        #[arg(long)]
        session: Option<String>,
        /// Only comments in this status.
        #[arg(long)]
        status: Option<String>,
    },
    /// Delete a comment.
    Delete { id: String },
}
