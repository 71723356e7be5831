//! League, team and lineage group model.

use serde::{Deserialize, Serialize};

use crate::cli::types::{GameId, Guid, LeagueId, LeagueKey, Season, TeamKey};
use crate::model::draft::DraftType;

/// Lifecycle flags the provider reports per game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameFlags {
    pub registration_over: bool,
    pub game_over: bool,
    pub offseason: bool,
}

/// One sport in one season as the provider defines it.
///
/// Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub key: String,
    pub season: Season,
    pub code: String,
    pub flags: GameFlags,
}

/// League-level settings the aggregator keeps after fetching.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeagueSettings {
    pub num_teams: u32,
    pub scoring_type: String,
    pub draft_type: DraftType,
    pub uses_playoff: bool,
}

/// A manager entry attached to a team in the standings response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerProfile {
    pub guid: Guid,
    pub email: String,
    pub name: String,
    pub is_commissioner: bool,
}

/// One fantasy team inside a league.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub key: TeamKey,
    pub id: u32,
    pub name: String,
    pub standing: u32,
    pub managers: Vec<ManagerProfile>,
}

/// A fully assembled league: settings plus standings for one season.
///
/// Built by the aggregator's fetch workers; owned by its `LeagueGroup`
/// after the aggregation consumer assigns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct League {
    pub key: LeagueKey,
    pub id: LeagueId,
    pub name: String,
    pub settings: LeagueSettings,
    pub teams: Vec<Team>,
    pub game: Game,
    /// Numeric id of the prior-season incarnation, when the provider's
    /// lineage back-reference parses.
    pub previous_league_id: Option<LeagueId>,
    pub draft_order: Vec<Guid>,
    pub draft_started: bool,
}

/// One league's multi-season lineage (keeper/dynasty continuity).
///
/// Every imported league belongs to exactly one group; `leagues` is
/// sorted ascending by season once aggregation completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueGroup {
    pub first_league_id: LeagueId,
    pub leagues: Vec<League>,
}

impl LeagueGroup {
    pub fn new(first_league_id: LeagueId) -> Self {
        Self {
            first_league_id,
            leagues: Vec::new(),
        }
    }
}
