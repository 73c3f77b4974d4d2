use clap::ValueEnum;

/// Shared output mode across all commands.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON.
    Json,
    /// Single-line JSON.
    Raw,
}

/// Global flags available before or after subcommands.
#[derive(Clone, Debug)]
pub struct GlobalFlags {
    pub format: OutputFormat,
    pub limit: Option<u32>,
    pub quiet: bool,
    pub verbose: bool,
    pub project: Option<String>,
    /// Identity the command acts as (reviewer or admin).
    pub actor: Option<String>,
    pub threshold: Option<u32>,
}

impl GlobalFlags {
    /// The acting user, required by commands that attribute or authorize.
    pub fn require_actor(&self) -> anyhow::Result<&str> {
        self.actor
            .as_deref()
            .filter(|a| !a.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("no acting user: pass --as <user> or set TALLY_USER"))
    }
}
