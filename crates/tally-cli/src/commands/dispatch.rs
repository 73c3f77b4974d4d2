use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Item { action } => commands::item::handle(&action, ctx, flags).await,
        Commands::Session { action } => commands::session::handle(&action, ctx, flags).await,
        Commands::Feedback { action } => commands::feedback::handle(&action, ctx, flags).await,
        Commands::Comment { action } => commands::comment::handle(&action, ctx, flags).await,
        Commands::Quorum(args) => commands::quorum::handle(&args, ctx, flags).await,
        Commands::Progress(args) => commands::progress::handle(&args, ctx, flags).await,
        Commands::Apply(args) => commands::apply::handle(&args, ctx, flags).await,
        Commands::Dashboard(args) => commands::dashboard::handle(&args, ctx, flags).await,
        Commands::Audit(args) => commands::audit::handle(&args, ctx, flags).await,
        Commands::Schema(args) => commands::schema::handle(&args, flags),
    }
}
