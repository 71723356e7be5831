//! Player catalog import command implementation

use std::sync::Arc;

use crate::{
    cli::types::{GameId, Guid},
    model::{PLAYER_PAGE_TOPIC, PLAYER_STAT_TOPIC},
    provider::{LeagueProvider, PersistencePort},
    queue::{queue_all_players, ImportQueue},
    storage::{FantasyDatabase, SqliteStore},
    worker::{CredentialCache, StatImportConfig, StatImportPool},
    yahoo::{EnvCredentials, YahooProvider},
    Result,
};

use super::resolve_guid;

/// Handle the import-players command
///
/// Queues the fixed catalog page sweep, closes the topics, and lets the
/// worker pool drain them.
pub async fn handle_import_players(
    guid: Option<Guid>,
    game_id: GameId,
    workers: usize,
) -> Result<()> {
    let guid = resolve_guid(guid)?;

    let page_queue = Arc::new(ImportQueue::new(PLAYER_PAGE_TOPIC));
    let stat_queue = Arc::new(ImportQueue::new(PLAYER_STAT_TOPIC));

    let queued = queue_all_players(&page_queue, &guid, game_id)?;
    page_queue.close();
    stat_queue.close();
    println!("Queued {} catalog pages for game {}", queued, game_id);

    let provider: Arc<dyn LeagueProvider> = Arc::new(YahooProvider::new(reqwest::Client::new()));
    let store: Arc<dyn PersistencePort> = Arc::new(SqliteStore::new(FantasyDatabase::new()?));
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

    println!("✓ Player import complete");

    Ok(())
}
