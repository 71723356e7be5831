//! `PersistencePort` implementation over the SQLite database.

use std::sync::Mutex;

use async_trait::async_trait;

use super::schema::FantasyDatabase;
use crate::cli::types::Guid;
use crate::error::{Result, SyncError};
use crate::model::{League, LeagueGroup, Player, PlayerStat};
use crate::provider::PersistencePort;

/// Persistence port backed by the local SQLite database.
///
/// The connection is not thread-safe, so the store serializes access
/// with a mutex; callers persist groups in parallel tasks and the
/// short, local writes queue up behind it.
pub struct SqliteStore {
    db: Mutex<FantasyDatabase>,
}

impl SqliteStore {
    pub fn new(db: FantasyDatabase) -> Self {
        Self { db: Mutex::new(db) }
    }
}

fn persistence(err: anyhow::Error) -> SyncError {
    SyncError::Persistence {
        message: err.to_string(),
    }
}

#[async_trait]
impl PersistencePort for SqliteStore {
    async fn save_league_group(&self, group: &LeagueGroup) -> Result<()> {
        self.db
            .lock()
            .unwrap()
            .upsert_league_group(group)
            .map(|_| ())
            .map_err(persistence)
    }

    async fn save_players(&self, players: &[Player]) -> Result<()> {
        self.db
            .lock()
            .unwrap()
            .upsert_players(players)
            .map(|_| ())
            .map_err(persistence)
    }

    async fn save_player_stats(&self, stats: &[PlayerStat]) -> Result<()> {
        self.db
            .lock()
            .unwrap()
            .upsert_player_stats(stats)
            .map(|_| ())
            .map_err(persistence)
    }

    async fn get_teams_for_managers(&self, guid: &Guid) -> Result<Vec<League>> {
        self.db
            .lock()
            .unwrap()
            .get_teams_for_managers(guid)
            .map_err(persistence)
    }
}
