//! Persisted player and stat model.

use serde::{Deserialize, Serialize};

use crate::cli::types::{GameId, PlayerKey, Season, Week};

/// Player catalog entry as the pipeline persists it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub key: PlayerKey,
    pub player_id: u64,
    pub name: String,
    pub position: String,
    pub team: Option<String>,
    pub game_id: GameId,
    pub season: Season,
}

/// One stat value for one player in one week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStat {
    pub player_key: PlayerKey,
    pub season: Season,
    pub week: Week,
    pub stat_id: u32,
    pub value: f64,
}
