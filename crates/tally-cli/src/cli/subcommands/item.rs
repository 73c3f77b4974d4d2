use clap::Subcommand;

/// Item commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ItemCommands {
    /// Create a project or task.
    Add {
        /// project or task.
        #[arg(long, default_value = "project")]
        kind: String,
        #[arg(long)]
        title: String,
        /// Parent project for tasks.
        #[arg(long)]
        parent: Option<String>,
        /// Initial fields as a JSON object.
        #[arg(long)]
        fields: Option<String>,
    },
    /// Get an item by ID.
    Get { id: String },
    /// List items.
    List {
        #[arg(long)]
        kind: Option<String>,
    },
}
