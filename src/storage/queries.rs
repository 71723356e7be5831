//! Basic database query operations

use super::schema::FantasyDatabase;
use crate::cli::types::{GameId, Guid, LeagueId, LeagueKey, PlayerKey, Season, TeamKey};
use crate::model::{
    Game, GameFlags, League, LeagueGroup, LeagueSettings, ManagerProfile, Player, PlayerStat, Team,
};
use anyhow::Result;
use rusqlite::{params, OptionalExtension, Row};
use std::time::{SystemTime, UNIX_EPOCH};

/// Raw league row, converted into a [`League`] once the team rows are
/// attached.
struct LeagueRow {
    league_key: String,
    league_id: u64,
    name: String,
    season: u16,
    game_id: u32,
    game_key: String,
    game_code: String,
    registration_over: bool,
    game_over: bool,
    offseason: bool,
    num_teams: u32,
    scoring_type: String,
    draft_type: String,
    uses_playoff: bool,
    previous_league_id: Option<u64>,
    draft_order: String,
    draft_started: bool,
}

impl FantasyDatabase {
    /// Upsert a league group by lineage.
    ///
    /// Looks up the stored lineage for the group's first league id and
    /// reuses it for every member league, so repeated imports never
    /// fork a lineage; a group seen for the first time mints a new
    /// lineage id. Returns the lineage id the members were written
    /// under.
    pub fn upsert_league_group(&mut self, group: &LeagueGroup) -> Result<i64> {
        let tx = self.conn.transaction()?;

        let existing: Option<i64> = tx
            .query_row(
                "SELECT lineage_id FROM league_groups WHERE first_league_id = ?",
                params![group.first_league_id.as_u64()],
                |row| row.get(0),
            )
            .optional()?;

        let lineage_id = match existing {
            Some(id) => id,
            None => {
                tx.execute(
                    "INSERT INTO league_groups (first_league_id) VALUES (?)",
                    params![group.first_league_id.as_u64()],
                )?;
                tx.last_insert_rowid()
            }
        };

        for league in &group.leagues {
            tx.execute(
                "INSERT OR REPLACE INTO leagues
                 (league_key, league_id, lineage_id, name, season,
                  game_id, game_key, game_code, registration_over, game_over, offseason,
                  num_teams, scoring_type, draft_type, uses_playoff,
                  previous_league_id, draft_order, draft_started)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    league.key.as_str(),
                    league.id.as_u64(),
                    lineage_id,
                    league.name,
                    league.game.season.as_u16(),
                    league.game.id.as_u32(),
                    league.game.key,
                    league.game.code,
                    league.game.flags.registration_over,
                    league.game.flags.game_over,
                    league.game.flags.offseason,
                    league.settings.num_teams,
                    league.settings.scoring_type,
                    league.settings.draft_type.to_string(),
                    league.settings.uses_playoff,
                    league.previous_league_id.map(|id| id.as_u64()),
                    serde_json::to_string(&league.draft_order)?,
                    league.draft_started,
                ],
            )?;

            for team in &league.teams {
                tx.execute(
                    "INSERT OR REPLACE INTO teams (team_key, league_key, team_id, name, standing)
                     VALUES (?, ?, ?, ?, ?)",
                    params![
                        team.key.as_str(),
                        league.key.as_str(),
                        team.id,
                        team.name,
                        team.standing
                    ],
                )?;

                for manager in &team.managers {
                    tx.execute(
                        "INSERT INTO users (email, guid, name) VALUES (?, ?, ?)
                         ON CONFLICT(email) DO UPDATE SET guid = excluded.guid, name = excluded.name",
                        params![manager.email, manager.guid.as_str(), manager.name],
                    )?;

                    tx.execute(
                        "INSERT OR REPLACE INTO team_managers (team_key, email, is_commissioner)
                         VALUES (?, ?, ?)",
                        params![team.key.as_str(), manager.email, manager.is_commissioner],
                    )?;
                }
            }
        }

        tx.commit()?;
        Ok(lineage_id)
    }

    /// The lineage id stored for a first league id, if any.
    pub fn lineage_for_first_league(&self, first_league_id: LeagueId) -> Result<Option<i64>> {
        let lineage = self
            .conn
            .query_row(
                "SELECT lineage_id FROM league_groups WHERE first_league_id = ?",
                params![first_league_id.as_u64()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(lineage)
    }

    /// Insert or update a page of players
    pub fn upsert_players(&mut self, players: &[Player]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let mut written = 0;

        for player in players {
            written += tx.execute(
                "INSERT OR REPLACE INTO players
                 (player_key, player_id, name, position, team, game_id, season)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
                params![
                    player.key.as_str(),
                    player.player_id,
                    player.name,
                    player.position,
                    player.team,
                    player.game_id.as_u32(),
                    player.season.as_u16(),
                ],
            )?;
        }

        tx.commit()?;
        Ok(written)
    }

    /// Insert or update stat values, preserving each row's created_at
    pub fn upsert_player_stats(&mut self, stats: &[PlayerStat]) -> Result<usize> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
        let tx = self.conn.transaction()?;
        let mut written = 0;

        for stat in stats {
            written += tx.execute(
                "INSERT OR REPLACE INTO player_stats
                 (player_key, season, week, stat_id, value, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?,
                         COALESCE((SELECT created_at FROM player_stats
                                  WHERE player_key = ? AND season = ? AND week = ? AND stat_id = ?), ?), ?)",
                params![
                    stat.player_key.as_str(),
                    stat.season.as_u16(),
                    stat.week.as_u16(),
                    stat.stat_id,
                    stat.value,
                    stat.player_key.as_str(),
                    stat.season.as_u16(),
                    stat.week.as_u16(),
                    stat.stat_id,
                    now,
                    now
                ],
            )?;
        }

        tx.commit()?;
        Ok(written)
    }

    /// Leagues in which the given user manages a team
    pub fn get_teams_for_managers(&self, guid: &Guid) -> Result<Vec<League>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT l.league_key, l.league_id, l.name, l.season,
                    l.game_id, l.game_key, l.game_code,
                    l.registration_over, l.game_over, l.offseason,
                    l.num_teams, l.scoring_type, l.draft_type, l.uses_playoff,
                    l.previous_league_id, l.draft_order, l.draft_started
             FROM leagues l
             JOIN teams t ON t.league_key = l.league_key
             JOIN team_managers tm ON tm.team_key = t.team_key
             JOIN users u ON u.email = tm.email
             WHERE u.guid = ?
             ORDER BY l.season, l.league_id",
        )?;

        let rows = stmt
            .query_map(params![guid.as_str()], Self::row_to_league_row)?
            .collect::<rusqlite::Result<Vec<LeagueRow>>>()?;

        rows.into_iter().map(|row| self.league_from_row(row)).collect()
    }

    /// Player keys stored for one game's catalog
    pub fn player_keys_for_game(&self, game_id: GameId, season: Season) -> Result<Vec<PlayerKey>> {
        let mut stmt = self.conn.prepare(
            "SELECT player_key FROM players
             WHERE game_id = ? AND season = ?
             ORDER BY player_key",
        )?;

        let keys = stmt
            .query_map(params![game_id.as_u32(), season.as_u16()], |row| {
                row.get::<_, String>(0)
            })?
            .collect::<rusqlite::Result<Vec<String>>>()?;

        Ok(keys.into_iter().map(PlayerKey::new).collect())
    }

    /// Number of players stored
    pub fn player_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM players", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Number of stat rows stored
    pub fn stat_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM player_stats", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn row_to_league_row(row: &Row) -> rusqlite::Result<LeagueRow> {
        Ok(LeagueRow {
            league_key: row.get(0)?,
            league_id: row.get(1)?,
            name: row.get(2)?,
            season: row.get(3)?,
            game_id: row.get(4)?,
            game_key: row.get(5)?,
            game_code: row.get(6)?,
            registration_over: row.get(7)?,
            game_over: row.get(8)?,
            offseason: row.get(9)?,
            num_teams: row.get(10)?,
            scoring_type: row.get(11)?,
            draft_type: row.get(12)?,
            uses_playoff: row.get(13)?,
            previous_league_id: row.get(14)?,
            draft_order: row.get(15)?,
            draft_started: row.get(16)?,
        })
    }

    fn league_from_row(&self, row: LeagueRow) -> Result<League> {
        let league_key = LeagueKey::new(row.league_key);
        let teams = self.teams_for_league(&league_key)?;

        Ok(League {
            key: league_key,
            id: LeagueId::new(row.league_id),
            name: row.name,
            settings: LeagueSettings {
                num_teams: row.num_teams,
                scoring_type: row.scoring_type,
                draft_type: row.draft_type.parse().unwrap_or_default(),
                uses_playoff: row.uses_playoff,
            },
            teams,
            game: Game {
                id: GameId::new(row.game_id),
                key: row.game_key,
                season: Season::new(row.season),
                code: row.game_code,
                flags: GameFlags {
                    registration_over: row.registration_over,
                    game_over: row.game_over,
                    offseason: row.offseason,
                },
            },
            previous_league_id: row.previous_league_id.map(LeagueId::new),
            draft_order: serde_json::from_str(&row.draft_order)?,
            draft_started: row.draft_started,
        })
    }

    fn teams_for_league(&self, league_key: &LeagueKey) -> Result<Vec<Team>> {
        let mut stmt = self.conn.prepare(
            "SELECT team_key, team_id, name, standing FROM teams
             WHERE league_key = ?
             ORDER BY team_id",
        )?;

        let rows = stmt
            .query_map(params![league_key.as_str()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, u32>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, u32>(3)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(team_key, team_id, name, standing)| {
                let team_key = TeamKey::new(team_key);
                let managers = self.managers_for_team(&team_key)?;
                Ok(Team {
                    key: team_key,
                    id: team_id,
                    name,
                    standing,
                    managers,
                })
            })
            .collect()
    }

    fn managers_for_team(&self, team_key: &TeamKey) -> Result<Vec<ManagerProfile>> {
        let mut stmt = self.conn.prepare(
            "SELECT u.guid, u.email, u.name, tm.is_commissioner
             FROM team_managers tm
             JOIN users u ON u.email = tm.email
             WHERE tm.team_key = ?
             ORDER BY u.email",
        )?;

        let managers = stmt
            .query_map(params![team_key.as_str()], |row| {
                Ok(ManagerProfile {
                    guid: Guid::new(row.get::<_, String>(0)?),
                    email: row.get(1)?,
                    name: row.get(2)?,
                    is_commissioner: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(managers)
    }
}
