use reqwest::Client;
use serde::Deserialize;

use crate::cli::types::{GameId, Guid, LeagueKey, PlayerKey, Week};
use crate::error::Result;
use crate::provider::{
    LeagueRef, LeagueSettingsRecord, PlayerSeasonRecord, PlayerStatRecord, TeamRecord,
};

/// Base path for the Yahoo Fantasy v2 API.
pub const FANTASY_BASE_URL: &str = "https://fantasysports.yahooapis.com/fantasy/v2";

#[derive(Deserialize)]
struct LeaguesEnvelope {
    leagues: Vec<LeagueRef>,
}

#[derive(Deserialize)]
struct SettingsEnvelope {
    league: LeagueSettingsRecord,
}

#[derive(Deserialize)]
struct StandingsEnvelope {
    teams: Vec<TeamRecord>,
}

#[derive(Deserialize)]
struct PlayersEnvelope {
    players: Vec<PlayerSeasonRecord>,
}

#[derive(Deserialize)]
struct StatsEnvelope {
    stats: Vec<PlayerStatRecord>,
}

pub async fn get_user_leagues(client: &Client, guid: &Guid) -> Result<Vec<LeagueRef>> {
    let url = format!("{FANTASY_BASE_URL}/users;use_login=1/games/leagues");
    let params = [("format", "json"), ("guid", guid.as_str())];

    let res = client
        .get(&url)
        .query(&params)
        .send()
        .await?
        .error_for_status()?
        .json::<LeaguesEnvelope>()
        .await?;

    Ok(res.leagues)
}

pub async fn get_league_settings(client: &Client, key: &LeagueKey) -> Result<LeagueSettingsRecord> {
    let url = format!("{FANTASY_BASE_URL}/league/{}/settings", key);
    let params = [("format", "json")];

    let res = client
        .get(&url)
        .query(&params)
        .send()
        .await?
        .error_for_status()?
        .json::<SettingsEnvelope>()
        .await?;

    Ok(res.league)
}

pub async fn get_league_standings(client: &Client, key: &LeagueKey) -> Result<Vec<TeamRecord>> {
    let url = format!("{FANTASY_BASE_URL}/league/{}/standings", key);
    let params = [("format", "json")];

    let res = client
        .get(&url)
        .query(&params)
        .send()
        .await?
        .error_for_status()?
        .json::<StandingsEnvelope>()
        .await?;

    Ok(res.teams)
}

pub async fn get_players_page(
    client: &Client,
    game_id: GameId,
    offset: u32,
    limit: u32,
) -> Result<Vec<PlayerSeasonRecord>> {
    let url = format!(
        "{FANTASY_BASE_URL}/game/{}/players;start={};count={}",
        game_id, offset, limit
    );
    let params = [("format", "json")];

    let res = client
        .get(&url)
        .query(&params)
        .send()
        .await?
        .error_for_status()?
        .json::<PlayersEnvelope>()
        .await?;

    Ok(res.players)
}

pub async fn get_player_stats(
    client: &Client,
    player_key: &PlayerKey,
    week: Week,
) -> Result<Vec<PlayerStatRecord>> {
    let url = format!(
        "{FANTASY_BASE_URL}/player/{}/stats;type=week;week={}",
        player_key, week
    );
    let params = [("format", "json")];

    let res = client
        .get(&url)
        .query(&params)
        .send()
        .await?
        .error_for_status()?
        .json::<StatsEnvelope>()
        .await?;

    Ok(res.stats)
}
