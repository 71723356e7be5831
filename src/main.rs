//! Entry point: parse CLI and dispatch to command handlers.

use clap::Parser;
use fantasy_sync::{
    cli::{Commands, FantasySync},
    commands::{
        import_leagues::handle_import_leagues, import_players::handle_import_players,
        import_stats::handle_import_stats,
    },
    Result,
};
use tracing_subscriber::EnvFilter;

/// Run the CLI.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let app = FantasySync::parse();

    match app.command {
        Commands::ImportLeagues { guid, verbose } => handle_import_leagues(guid, verbose).await?,

        Commands::ImportPlayers {
            guid,
            game_id,
            workers,
        } => handle_import_players(guid, game_id, workers).await?,

        Commands::ImportStats {
            guid,
            game_id,
            season,
            week,
            workers,
        } => handle_import_stats(guid, game_id, season, week, workers).await?,
    }

    Ok(())
}
