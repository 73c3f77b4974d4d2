use std::io::Read;

use anyhow::Context;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ApplyArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `tally apply`.
///
/// Malformed suggestions are reported per entry in the result; only an
/// unreadable or non-array input fails the command.
pub async fn handle(args: &ApplyArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let result = match (&args.file, &args.from_feedback) {
        (Some(path), _) => {
            let entries = read_entries(path)?;
            ctx.service.apply_suggestion_entries(&entries).await
        }
        (None, Some(item)) => {
            let suggestions = ctx.service.suggestions_from_feedback(item).await?;
            ctx.service.apply_suggestions(suggestions).await
        }
        (None, None) => anyhow::bail!("pass --file or --from-feedback"),
    };

    if !result.failures.is_empty() {
        tracing::warn!(
            failed = result.failures.len(),
            applied = result.successes.len(),
            "some suggestions were not applied"
        );
    }
    output(&result, flags.format)
}

fn read_entries(path: &str) -> anyhow::Result<Vec<serde_json::Value>> {
    let raw = if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read suggestions from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?
    };
    parse_entries(&raw)
}

/// Only the outer array is checked here; each entry is judged on its own
/// when the batch is applied.
fn parse_entries(raw: &str) -> anyhow::Result<Vec<serde_json::Value>> {
    serde_json::from_str(raw).context("suggestions must be a JSON array")
}
