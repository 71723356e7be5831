//! External collaborator ports.
//!
//! The pipeline talks to three seams: the fantasy provider's API, the
//! persistence layer, and the OAuth credential store. Each is a focused
//! async trait so tests can substitute counting stubs and the wire
//! adapter stays swappable.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::cli::types::{GameId, Guid, LeagueId, LeagueKey, PlayerKey, Season, TeamKey, Week};
use crate::error::Result;
use crate::model::{League, LeagueGroup, Player, PlayerStat};

/// A (game, league) membership pair from the user's account.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LeagueRef {
    #[serde(rename = "gameId")]
    pub game_id: GameId,
    #[serde(rename = "gameKey")]
    pub game_key: String,
    #[serde(rename = "gameCode")]
    pub game_code: String,
    pub season: Season,
    #[serde(rename = "leagueKey")]
    pub league_key: LeagueKey,
    #[serde(rename = "leagueId")]
    pub league_id: LeagueId,
    #[serde(rename = "registrationOver", default)]
    pub registration_over: bool,
    #[serde(rename = "gameOver", default)]
    pub game_over: bool,
    #[serde(default)]
    pub offseason: bool,
}

/// League settings as fetched, including the raw lineage back-reference.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct LeagueSettingsRecord {
    pub name: String,
    #[serde(rename = "numTeams")]
    pub num_teams: u32,
    #[serde(rename = "scoringType", default)]
    pub scoring_type: String,
    #[serde(rename = "draftType", default)]
    pub draft_type: String,
    #[serde(rename = "usesPlayoff", default)]
    pub uses_playoff: bool,
    /// Lineage back-reference of the form `"<priorGameID>_<priorLeagueID>"`,
    /// empty for a league with no prior season.
    #[serde(rename = "renew", default)]
    pub renew: String,
    #[serde(rename = "draftStarted", default)]
    pub draft_started: bool,
    #[serde(rename = "draftOrder", default)]
    pub draft_order: Vec<Guid>,
}

/// A manager entry inside a standings team record.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ManagerRecord {
    pub guid: Guid,
    pub email: String,
    pub nickname: String,
    #[serde(rename = "isCommissioner", default)]
    pub is_commissioner: bool,
}

/// One team row from the standings response.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TeamRecord {
    #[serde(rename = "teamKey")]
    pub team_key: TeamKey,
    #[serde(rename = "teamId")]
    pub team_id: u32,
    pub name: String,
    #[serde(default)]
    pub standing: u32,
    #[serde(default)]
    pub managers: Vec<ManagerRecord>,
}

/// One player from a catalog page.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlayerSeasonRecord {
    #[serde(rename = "playerKey")]
    pub player_key: PlayerKey,
    #[serde(rename = "playerId")]
    pub player_id: u64,
    pub name: String,
    #[serde(default)]
    pub position: String,
    #[serde(rename = "editorialTeam", default)]
    pub editorial_team: Option<String>,
    pub season: Season,
}

/// One stat value from a player-week stats response.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlayerStatRecord {
    #[serde(rename = "statId")]
    pub stat_id: u32,
    pub value: f64,
}

/// A stored OAuth token for one user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OAuthToken {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
}

/// Supplies paginated league/team/manager/player records for a user's
/// account. Catalog and stat fetches run under the per-user
/// authenticated client the credential port produced.
#[async_trait]
pub trait LeagueProvider: Send + Sync {
    /// Flat list of (game, league) pairs the user belongs to.
    async fn fetch_user_leagues(&self, guid: &Guid) -> Result<Vec<LeagueRef>>;

    /// Settings for one league, including the lineage back-reference.
    async fn fetch_league_settings(&self, key: &LeagueKey) -> Result<LeagueSettingsRecord>;

    /// Standings (teams with managers) for one league.
    async fn fetch_league_standings(&self, key: &LeagueKey) -> Result<Vec<TeamRecord>>;

    /// One page of a game's player catalog.
    async fn fetch_players_page(
        &self,
        client: &Client,
        game_id: GameId,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<PlayerSeasonRecord>>;

    /// One player's stat values for one week.
    async fn fetch_player_stats(
        &self,
        client: &Client,
        player_key: &PlayerKey,
        week: Week,
    ) -> Result<Vec<PlayerStatRecord>>;
}

/// Persists aggregation and import output.
#[async_trait]
pub trait PersistencePort: Send + Sync {
    /// Upsert-by-lineage: reuse the stored lineage for the group's first
    /// league id if one exists, otherwise mint a new one, then write the
    /// member leagues.
    async fn save_league_group(&self, group: &LeagueGroup) -> Result<()>;

    async fn save_players(&self, players: &[Player]) -> Result<()>;

    async fn save_player_stats(&self, stats: &[PlayerStat]) -> Result<()>;

    /// Leagues in which the given user manages a team.
    async fn get_teams_for_managers(&self, guid: &Guid) -> Result<Vec<League>>;
}

/// Resolves a stored OAuth token into an authenticated HTTP client.
#[async_trait]
pub trait CredentialPort: Send + Sync {
    async fn get_user_oauth_token(&self, guid: &Guid) -> Result<OAuthToken>;

    async fn exchange_token_for_client(&self, token: &OAuthToken) -> Result<Client>;
}
