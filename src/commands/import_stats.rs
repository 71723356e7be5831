//! Player stat import command implementation

use std::sync::Arc;

use crate::{
    cli::types::{GameId, Guid, Season, Week},
    model::{PLAYER_PAGE_TOPIC, PLAYER_STAT_TOPIC},
    provider::{LeagueProvider, PersistencePort},
    queue::{queue_player_stats, ImportQueue},
    storage::{FantasyDatabase, SqliteStore},
    worker::{CredentialCache, StatImportConfig, StatImportPool},
    yahoo::{EnvCredentials, YahooProvider},
    Result,
};

use super::resolve_guid;

/// Handle the import-stats command
///
/// Enqueues one stat request per stored player of the game, closes the
/// topics, and lets the worker pool drain them.
pub async fn handle_import_stats(
    guid: Option<Guid>,
    game_id: GameId,
    season: Season,
    week: Week,
    workers: usize,
) -> Result<()> {
    let guid = resolve_guid(guid)?;

    let db = FantasyDatabase::new()?;
    let player_keys = db.player_keys_for_game(game_id, season)?;

    if player_keys.is_empty() {
        println!(
            "No stored players for game {} season {}; run import-players first",
            game_id, season
        );
        return Ok(());
    }

    let page_queue = Arc::new(ImportQueue::new(PLAYER_PAGE_TOPIC));
    let stat_queue = Arc::new(ImportQueue::new(PLAYER_STAT_TOPIC));

    let queued = queue_player_stats(&stat_queue, &guid, &player_keys, week, season)?;
    page_queue.close();
    stat_queue.close();
    println!("Queued {} stat requests for week {}", queued, week);

    let provider: Arc<dyn LeagueProvider> = Arc::new(YahooProvider::new(reqwest::Client::new()));
    let store: Arc<dyn PersistencePort> = Arc::new(SqliteStore::new(db));
    let credentials = Arc::new(CredentialCache::new(Arc::new(EnvCredentials)));

    let pool = StatImportPool::new(
        StatImportConfig {
            workers,
            ..Default::default()
        },
        provider,
        store,
        credentials,
        page_queue,
        stat_queue,
    );

    pool.start().await;
    pool.wait().await;

    println!("✓ Stat import complete");

    Ok(())
}
