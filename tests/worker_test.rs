//! Tests for the import queues, credential cache and worker pool

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use fantasy_sync::model::{
    ImportMessage, Player, PlayerStat, PLAYER_PAGE_TOPIC, PLAYER_STAT_TOPIC,
};
use fantasy_sync::provider::{
    CredentialPort, LeagueProvider, LeagueRef, LeagueSettingsRecord, OAuthToken,
    PersistencePort, PlayerSeasonRecord, PlayerStatRecord, TeamRecord,
};
use fantasy_sync::queue::{queue_all_players, queue_player_stats, ImportQueue};
use fantasy_sync::worker::{CredentialCache, StatImportConfig, StatImportPool};
use fantasy_sync::{
    GameId, Guid, League, LeagueKey, PlayerKey, Season, SyncError, Week,
};

/// Credential stub that counts token exchanges.
struct CountingCredentials {
    exchanges: AtomicUsize,
}

impl CountingCredentials {
    fn new() -> Self {
        Self {
            exchanges: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl CredentialPort for CountingCredentials {
    async fn get_user_oauth_token(&self, guid: &Guid) -> fantasy_sync::Result<OAuthToken> {
        Ok(OAuthToken {
            access_token: format!("token-{guid}"),
            refresh_token: String::new(),
        })
    }

    async fn exchange_token_for_client(
        &self,
        _token: &OAuthToken,
    ) -> fantasy_sync::Result<reqwest::Client> {
        // Widen the race window so concurrent misses would double up
        // without the cache's write-lock exchange.
        tokio::time::sleep(Duration::from_millis(10)).await;
        self.exchanges.fetch_add(1, Ordering::SeqCst);
        Ok(reqwest::Client::new())
    }
}

/// Provider stub serving a small catalog and configurable stat failures.
struct StubProvider {
    catalog_size: u32,
    fail_stats_with_credential_error: bool,
    pages_served: Mutex<Vec<u32>>,
}

impl StubProvider {
    fn new(catalog_size: u32) -> Self {
        Self {
            catalog_size,
            fail_stats_with_credential_error: false,
            pages_served: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl LeagueProvider for StubProvider {
    async fn fetch_user_leagues(&self, _guid: &Guid) -> fantasy_sync::Result<Vec<LeagueRef>> {
        Ok(Vec::new())
    }

    async fn fetch_league_settings(
        &self,
        key: &LeagueKey,
    ) -> fantasy_sync::Result<LeagueSettingsRecord> {
        Err(SyncError::ProviderFetch {
            resource: key.to_string(),
            message: "not stubbed".to_string(),
        })
    }

    async fn fetch_league_standings(
        &self,
        _key: &LeagueKey,
    ) -> fantasy_sync::Result<Vec<TeamRecord>> {
        Ok(Vec::new())
    }

    async fn fetch_players_page(
        &self,
        _client: &reqwest::Client,
        _game_id: GameId,
        offset: u32,
        limit: u32,
    ) -> fantasy_sync::Result<Vec<PlayerSeasonRecord>> {
        self.pages_served.lock().unwrap().push(offset);

        if offset >= self.catalog_size {
            return Ok(Vec::new());
        }

        let end = (offset + limit).min(self.catalog_size);
        Ok((offset..end)
            .map(|i| PlayerSeasonRecord {
                player_key: PlayerKey::new(format!("390.p.{i}")),
                player_id: i as u64,
                name: format!("Player {i}"),
                position: "WR".to_string(),
                editorial_team: None,
                season: Season::new(2019),
            })
            .collect())
    }

    async fn fetch_player_stats(
        &self,
        _client: &reqwest::Client,
        player_key: &PlayerKey,
        _week: Week,
    ) -> fantasy_sync::Result<Vec<PlayerStatRecord>> {
        if self.fail_stats_with_credential_error {
            return Err(SyncError::Credential {
                guid: "ABC".to_string(),
            });
        }

        Ok(vec![PlayerStatRecord {
            stat_id: 4,
            value: player_key.as_str().len() as f64,
        }])
    }
}

/// Store stub recording everything persisted.
#[derive(Default)]
struct RecordingStore {
    players: Mutex<Vec<Player>>,
    stats: Mutex<Vec<PlayerStat>>,
}

#[async_trait]
impl PersistencePort for RecordingStore {
    async fn save_league_group(
        &self,
        _group: &fantasy_sync::LeagueGroup,
    ) -> fantasy_sync::Result<()> {
        Ok(())
    }

    async fn save_players(&self, players: &[Player]) -> fantasy_sync::Result<()> {
        self.players.lock().unwrap().extend_from_slice(players);
        Ok(())
    }

    async fn save_player_stats(&self, stats: &[PlayerStat]) -> fantasy_sync::Result<()> {
        self.stats.lock().unwrap().extend_from_slice(stats);
        Ok(())
    }

    async fn get_teams_for_managers(&self, _guid: &Guid) -> fantasy_sync::Result<Vec<League>> {
        Ok(Vec::new())
    }
}

fn test_pool(
    provider: Arc<StubProvider>,
    store: Arc<RecordingStore>,
    credentials: Arc<CredentialCache>,
    page_queue: Arc<ImportQueue>,
    stat_queue: Arc<ImportQueue>,
    workers: usize,
) -> StatImportPool {
    StatImportPool::new(
        StatImportConfig {
            workers,
            shutdown_timeout: Duration::from_secs(5),
        },
        provider,
        store,
        credentials,
        page_queue,
        stat_queue,
    )
}

#[tokio::test]
async fn test_queue_all_players_enqueues_sixty_pages() {
    let queue = ImportQueue::new(PLAYER_PAGE_TOPIC);
    let queued = queue_all_players(&queue, &Guid::new("ABC"), GameId::new(390)).unwrap();
    assert_eq!(queued, 60);
    assert_eq!(queue.len(), 60);
    queue.close();

    let mut offsets = Vec::new();
    while let Some(message) = queue.pop().await {
        match message {
            ImportMessage::PlayerPage(request) => {
                assert_eq!(request.limit, 25);
                assert_eq!(request.game_id, GameId::new(390));
                offsets.push(request.offset);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    let expected: Vec<u32> = (0..60).map(|page| page * 25).collect();
    assert_eq!(offsets, expected);
    assert_eq!(*offsets.last().unwrap(), 1475);
}

#[tokio::test]
async fn test_concurrent_credential_requests_trigger_one_exchange() {
    let port = Arc::new(CountingCredentials::new());
    let cache = Arc::new(CredentialCache::new(port.clone()));
    let guid = Guid::new("ABC");

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let guid = guid.clone();
            tokio::spawn(async move { cache.client_for(&guid).await })
        })
        .collect();

    for task in tasks {
        assert!(task.await.unwrap().is_ok());
    }

    assert_eq!(port.exchanges.load(Ordering::SeqCst), 1);
    assert_eq!(cache.cached_count().await, 1);
}

#[tokio::test]
async fn test_evict_forces_fresh_exchange() {
    let port = Arc::new(CountingCredentials::new());
    let cache = CredentialCache::new(port.clone());
    let guid = Guid::new("ABC");

    cache.client_for(&guid).await.unwrap();
    assert!(cache.evict(&guid).await);
    cache.client_for(&guid).await.unwrap();

    assert_eq!(port.exchanges.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_pool_drains_catalog_pages_and_persists_players() {
    let provider = Arc::new(StubProvider::new(50));
    let store = Arc::new(RecordingStore::default());
    let credentials = Arc::new(CredentialCache::new(Arc::new(CountingCredentials::new())));

    let page_queue = Arc::new(ImportQueue::new(PLAYER_PAGE_TOPIC));
    let stat_queue = Arc::new(ImportQueue::new(PLAYER_STAT_TOPIC));
    queue_all_players(&page_queue, &Guid::new("ABC"), GameId::new(390)).unwrap();
    page_queue.close();
    stat_queue.close();

    let pool = test_pool(
        provider.clone(),
        store.clone(),
        credentials,
        page_queue.clone(),
        stat_queue,
        4,
    );
    pool.start().await;
    pool.wait().await;

    // Every page was attempted, the two real pages produced players.
    assert_eq!(provider.pages_served.lock().unwrap().len(), 60);
    assert_eq!(store.players.lock().unwrap().len(), 50);
    assert!(page_queue.is_empty());
}

#[tokio::test]
async fn test_stat_messages_transform_and_persist() {
    let provider = Arc::new(StubProvider::new(0));
    let store = Arc::new(RecordingStore::default());
    let credentials = Arc::new(CredentialCache::new(Arc::new(CountingCredentials::new())));

    let page_queue = Arc::new(ImportQueue::new(PLAYER_PAGE_TOPIC));
    let stat_queue = Arc::new(ImportQueue::new(PLAYER_STAT_TOPIC));
    let keys = vec![PlayerKey::new("390.p.1"), PlayerKey::new("390.p.2")];
    queue_player_stats(
        &stat_queue,
        &Guid::new("ABC"),
        &keys,
        Week::new(7),
        Season::new(2019),
    )
    .unwrap();
    page_queue.close();
    stat_queue.close();

    let pool = test_pool(provider, store.clone(), credentials, page_queue, stat_queue, 2);
    pool.start().await;
    pool.wait().await;

    let stats = store.stats.lock().unwrap();
    assert_eq!(stats.len(), 2);
    assert!(stats.iter().all(|stat| stat.week == Week::new(7)));
    assert!(stats.iter().all(|stat| stat.season == Season::new(2019)));
}

#[tokio::test]
async fn test_credential_failure_evicts_cache_and_drops_message() {
    let mut provider = StubProvider::new(0);
    provider.fail_stats_with_credential_error = true;
    let provider = Arc::new(provider);

    let store = Arc::new(RecordingStore::default());
    let credentials = Arc::new(CredentialCache::new(Arc::new(CountingCredentials::new())));

    let page_queue = Arc::new(ImportQueue::new(PLAYER_PAGE_TOPIC));
    let stat_queue = Arc::new(ImportQueue::new(PLAYER_STAT_TOPIC));
    queue_player_stats(
        &stat_queue,
        &Guid::new("ABC"),
        &[PlayerKey::new("390.p.1")],
        Week::new(1),
        Season::new(2019),
    )
    .unwrap();
    page_queue.close();
    stat_queue.close();

    let pool = test_pool(
        provider,
        store.clone(),
        credentials.clone(),
        page_queue,
        stat_queue,
        1,
    );
    pool.start().await;
    pool.wait().await;

    // The poisoned credential was evicted and the message dropped.
    assert_eq!(credentials.cached_count().await, 0);
    assert!(store.stats.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_stop_cancels_blocked_workers() {
    let provider = Arc::new(StubProvider::new(0));
    let store = Arc::new(RecordingStore::default());
    let credentials = Arc::new(CredentialCache::new(Arc::new(CountingCredentials::new())));

    // Queues stay open and empty: workers block waiting for messages.
    let page_queue = Arc::new(ImportQueue::new(PLAYER_PAGE_TOPIC));
    let stat_queue = Arc::new(ImportQueue::new(PLAYER_STAT_TOPIC));

    let pool = test_pool(provider, store, credentials, page_queue, stat_queue, 2);
    pool.start().await;
    assert!(pool.is_running().await);

    // Let the workers reach their blocking select before cancelling.
    tokio::time::sleep(Duration::from_millis(50)).await;
    pool.stop().await;
    assert!(!pool.is_running().await);
}
