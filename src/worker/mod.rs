//! Stat import worker pool and the per-user credential cache.
//!
//! Workers drain the two import topics, resolve a cached authenticated
//! client for the message's user, fetch from the provider, transform
//! into the internal player/stat model and persist. A credential-class
//! failure evicts the cached client and drops the message — the
//! pipeline's only self-healing mechanism; there is no per-message
//! retry.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tokio::sync::{Mutex, Notify, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::cli::types::Guid;
use crate::error::Result;
use crate::model::{ImportMessage, ImportPlayer, ImportPlayerStat, Player, PlayerStat};
use crate::provider::{
    CredentialPort, LeagueProvider, PersistencePort, PlayerSeasonRecord, PlayerStatRecord,
};
use crate::queue::ImportQueue;

/// Per-user HTTP client cache shared by every worker.
///
/// Reads take the read lock; a miss upgrades to the write lock,
/// re-checks, and performs the token exchange while still holding it,
/// so concurrent misses for the same user cost exactly one exchange.
pub struct CredentialCache {
    clients: RwLock<HashMap<Guid, Client>>,
    port: Arc<dyn CredentialPort>,
}

impl CredentialCache {
    pub fn new(port: Arc<dyn CredentialPort>) -> Self {
        Self {
            clients: RwLock::new(HashMap::new()),
            port,
        }
    }

    /// Resolve the authenticated client for a user, exchanging the
    /// stored token on first use.
    pub async fn client_for(&self, guid: &Guid) -> Result<Client> {
        if let Some(client) = self.clients.read().await.get(guid) {
            return Ok(client.clone());
        }

        let mut clients = self.clients.write().await;
        if let Some(client) = clients.get(guid) {
            return Ok(client.clone());
        }

        let token = self.port.get_user_oauth_token(guid).await?;
        let client = self.port.exchange_token_for_client(&token).await?;
        clients.insert(guid.clone(), client.clone());
        Ok(client)
    }

    /// Drop a user's cached client so the next request re-exchanges.
    pub async fn evict(&self, guid: &Guid) -> bool {
        self.clients.write().await.remove(guid).is_some()
    }

    pub async fn cached_count(&self) -> usize {
        self.clients.read().await.len()
    }
}

/// Tuning for the stat import pool.
#[derive(Debug, Clone)]
pub struct StatImportConfig {
    /// Number of parallel workers draining the topics.
    pub workers: usize,
    /// How long `stop` waits for each worker to finish its in-flight
    /// message.
    pub shutdown_timeout: Duration,
}

impl Default for StatImportConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            shutdown_timeout: Duration::from_secs(10),
        }
    }
}

/// Everything a worker needs, shared once.
struct WorkerContext {
    provider: Arc<dyn LeagueProvider>,
    store: Arc<dyn PersistencePort>,
    credentials: Arc<CredentialCache>,
    page_queue: Arc<ImportQueue>,
    stat_queue: Arc<ImportQueue>,
    shutdown: Notify,
}

/// Worker pool draining the player-page and player-stat topics.
pub struct StatImportPool {
    config: StatImportConfig,
    context: Arc<WorkerContext>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl StatImportPool {
    pub fn new(
        config: StatImportConfig,
        provider: Arc<dyn LeagueProvider>,
        store: Arc<dyn PersistencePort>,
        credentials: Arc<CredentialCache>,
        page_queue: Arc<ImportQueue>,
        stat_queue: Arc<ImportQueue>,
    ) -> Self {
        Self {
            config,
            context: Arc::new(WorkerContext {
                provider,
                store,
                credentials,
                page_queue,
                stat_queue,
                shutdown: Notify::new(),
            }),
            handles: Mutex::new(Vec::new()),
        }
    }

    /// Spawn the workers. Idempotent: calling on a running pool logs a
    /// warning and returns.
    pub async fn start(&self) {
        let mut handles = self.handles.lock().await;
        if !handles.is_empty() {
            warn!("stat import pool is already running");
            return;
        }

        info!(workers = self.config.workers, "starting stat import pool");
        for id in 0..self.config.workers {
            let context = Arc::clone(&self.context);
            handles.push(tokio::spawn(run_worker(id, context)));
        }
    }

    /// Signal cancellation and wait for every worker.
    ///
    /// Workers finish the message they are processing; nothing is
    /// re-queued. Messages still sitting in the queues are left there.
    pub async fn stop(&self) {
        let mut handles = self.handles.lock().await;
        if handles.is_empty() {
            debug!("stat import pool is already stopped");
            return;
        }

        info!("stopping stat import pool");
        self.context.shutdown.notify_waiters();

        for (id, handle) in handles.drain(..).enumerate() {
            match tokio::time::timeout(self.config.shutdown_timeout, handle).await {
                Ok(Ok(())) => debug!(worker = id, "worker stopped"),
                Ok(Err(err)) => error!(worker = id, error = %err, "worker panicked"),
                Err(_) => warn!(worker = id, "worker did not stop within timeout"),
            }
        }
    }

    /// Wait for every worker to exit on its own.
    ///
    /// One-shot imports close the queues after producing and let the
    /// pool drain them; each worker exits once both topics are closed
    /// and dry.
    pub async fn wait(&self) {
        let mut handles = self.handles.lock().await;
        for (id, handle) in handles.drain(..).enumerate() {
            if let Err(err) = handle.await {
                error!(worker = id, error = %err, "worker panicked");
            }
        }
    }

    pub async fn is_running(&self) -> bool {
        !self.handles.lock().await.is_empty()
    }
}

/// One worker: drain both topics until cancellation or both queues are
/// closed and dry.
async fn run_worker(id: usize, context: Arc<WorkerContext>) {
    debug!(worker = id, "worker started");

    let mut pages_done = false;
    let mut stats_done = false;

    loop {
        tokio::select! {
            // Cancellation wins over pending messages.
            biased;

            _ = context.shutdown.notified() => {
                debug!(worker = id, "worker observed shutdown");
                break;
            }

            message = context.page_queue.pop(), if !pages_done => {
                match message {
                    Some(message) => handle_message(&context, message).await,
                    None => pages_done = true,
                }
            }

            message = context.stat_queue.pop(), if !stats_done => {
                match message {
                    Some(message) => handle_message(&context, message).await,
                    None => stats_done = true,
                }
            }
        }

        if pages_done && stats_done {
            break;
        }
    }

    debug!(worker = id, "worker stopped");
}

/// Process one message: resolve the credential, fetch, transform,
/// persist. Every failure drops only this message.
async fn handle_message(context: &WorkerContext, message: ImportMessage) {
    let guid = message.guid().clone();

    let client = match context.credentials.client_for(&guid).await {
        Ok(client) => client,
        Err(err) => {
            warn!(%guid, error = %err, "dropping message: credential resolution failed");
            return;
        }
    };

    match message {
        ImportMessage::PlayerPage(request) => {
            handle_player_page(context, &client, &guid, request).await;
        }
        ImportMessage::PlayerStat(request) => {
            handle_player_stat(context, &client, &guid, request).await;
        }
    }
}

async fn handle_player_page(
    context: &WorkerContext,
    client: &Client,
    guid: &Guid,
    request: ImportPlayer,
) {
    let records = match context
        .provider
        .fetch_players_page(client, request.game_id, request.offset, request.limit)
        .await
    {
        Ok(records) => records,
        Err(err) => {
            drop_failed_fetch(context, guid, "player page", err).await;
            return;
        }
    };

    if records.is_empty() {
        debug!(game = %request.game_id, offset = request.offset, "empty catalog page");
        return;
    }

    let players: Vec<Player> = records
        .into_iter()
        .map(|record| player_from_record(record, &request))
        .collect();

    if let Err(err) = context.store.save_players(&players).await {
        error!(game = %request.game_id, offset = request.offset, error = %err,
               "failed to persist player page");
    }
}

async fn handle_player_stat(
    context: &WorkerContext,
    client: &Client,
    guid: &Guid,
    request: ImportPlayerStat,
) {
    let records = match context
        .provider
        .fetch_player_stats(client, &request.player_key, request.week)
        .await
    {
        Ok(records) => records,
        Err(err) => {
            drop_failed_fetch(context, guid, "player stats", err).await;
            return;
        }
    };

    let stats: Vec<PlayerStat> = records
        .into_iter()
        .map(|record| stat_from_record(record, &request))
        .collect();

    if let Err(err) = context.store.save_player_stats(&stats).await {
        error!(player = %request.player_key, week = %request.week, error = %err,
               "failed to persist player stats");
    }
}

/// A credential-class failure poisons the cached client: evict it so
/// the next message for this user re-exchanges. Anything else is a
/// transient provider failure; either way the message is dropped.
async fn drop_failed_fetch(
    context: &WorkerContext,
    guid: &Guid,
    resource: &str,
    err: crate::error::SyncError,
) {
    if err.is_credential() {
        context.credentials.evict(guid).await;
        warn!(%guid, resource, error = %err, "evicted credential; dropping message");
    } else {
        warn!(%guid, resource, error = %err, "fetch failed; dropping message");
    }
}

fn player_from_record(record: PlayerSeasonRecord, request: &ImportPlayer) -> Player {
    Player {
        key: record.player_key,
        player_id: record.player_id,
        name: record.name,
        position: record.position,
        team: record.editorial_team,
        game_id: request.game_id,
        season: record.season,
    }
}

fn stat_from_record(record: PlayerStatRecord, request: &ImportPlayerStat) -> PlayerStat {
    PlayerStat {
        player_key: request.player_key.clone(),
        season: request.season,
        week: request.week,
        stat_id: record.stat_id,
        value: record.value,
    }
}
