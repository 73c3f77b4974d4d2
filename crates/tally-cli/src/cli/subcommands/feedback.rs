use clap::Subcommand;

/// Field feedback commands.
///
/// Values are parsed as JSON when possible (`42`, `true`, `["a","b"]`) and
/// taken as plain text otherwise.
#[derive(Clone, Debug, Subcommand)]
pub enum FeedbackCommands {
    /// Propose a value for one field (replaces an earlier proposal).
    Upsert {
        session: String,
        field: String,
        proposed: String,
        /// Value the reviewer saw.
        #[arg(long)]
        current: Option<String>,
        #[arg(long)]
        comment: Option<String>,
        #[arg(long)]
        area_specific: bool,
    },
    /// List feedback for a session or an item.
    List {
        #[arg(long, conflicts_with = "item", required_unless_present = "item")]
        session: Option<String>,
        #[arg(long)]
        item: Option<String>,
    },
    /// Delete one feedback entry.
    Delete { id: String },
}
