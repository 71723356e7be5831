//! Queue payloads for the stat import pipeline.
//!
//! Payloads are transient: serialized onto a topic queue, consumed once
//! by a worker, never persisted.

use serde::{Deserialize, Serialize};

use crate::cli::types::{GameId, Guid, PlayerKey, Season, Week};

/// Topic carrying bulk player catalog page requests.
pub const PLAYER_PAGE_TOPIC: &str = "player-page-import";

/// Topic carrying single player-week stat requests.
pub const PLAYER_STAT_TOPIC: &str = "player-stat-import";

/// Catalog page size the provider serves.
pub const PLAYER_PAGE_SIZE: u32 = 25;

/// Fixed number of catalog pages requested per game.
///
/// Not driven by the true catalog size; pages past the end come back
/// empty and the workers drop them.
pub const PLAYER_PAGE_COUNT: u32 = 60;

/// Request for one page of a game's player catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportPlayer {
    pub guid: Guid,
    pub game_id: GameId,
    pub offset: u32,
    pub limit: u32,
}

/// Request for one player's stats for one week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportPlayerStat {
    pub guid: Guid,
    pub player_key: PlayerKey,
    pub week: Week,
    pub season: Season,
}

/// Tagged queue message, decoded at the queue boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImportMessage {
    PlayerPage(ImportPlayer),
    PlayerStat(ImportPlayerStat),
}

impl ImportMessage {
    /// The user GUID whose credential this message is processed under.
    pub fn guid(&self) -> &Guid {
        match self {
            ImportMessage::PlayerPage(req) => &req.guid,
            ImportMessage::PlayerStat(req) => &req.guid,
        }
    }
}
