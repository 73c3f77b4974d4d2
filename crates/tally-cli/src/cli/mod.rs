use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `tally` binary.
#[derive(Debug, Parser)]
#[command(
    name = "tally",
    version,
    about = "tally - multi-reviewer consensus for projects and tasks"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Max results to return
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project root path (defaults to auto-detect via .tally)
    #[arg(short, long, global = true)]
    pub project: Option<String>,

    /// Act as this user
    #[arg(long = "as", global = true, env = "TALLY_USER")]
    pub actor: Option<String>,

    /// Override the configured quorum threshold for this invocation
    #[arg(long, global = true, value_parser = clap::value_parser!(u32).range(1..))]
    pub threshold: Option<u32>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            quiet: self.quiet,
            verbose: self.verbose,
            project: self.project.clone(),
            actor: self.actor.clone(),
            threshold: self.threshold,
        }
    }
}
