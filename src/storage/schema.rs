//! Database schema and connection management

use crate::error::SyncError;
use anyhow::Result;
use dirs::cache_dir;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Database connection manager for imported fantasy data
pub struct FantasyDatabase {
    pub(crate) conn: Connection,
}

impl FantasyDatabase {
    /// Create a new database connection and ensure tables exist
    pub fn new() -> Result<Self> {
        Self::open_at(&Self::database_path()?)
    }

    /// Open a database at an explicit path
    pub fn open_at(path: &Path) -> Result<Self> {
        // Ensure the parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        let mut db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Create an in-memory database (used by tests)
    pub fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Get the path to the database file
    fn database_path() -> Result<PathBuf> {
        let cache_dir = cache_dir().ok_or_else(|| SyncError::Persistence {
            message: "Could not determine cache directory".to_string(),
        })?;
        Ok(cache_dir.join("fantasy-sync").join("fantasy.db"))
    }

    /// Initialize the database schema
    pub(crate) fn initialize_schema(&mut self) -> Result<()> {
        // One row per lineage; first_league_id is the external id the
        // upsert-by-lineage lookup keys on
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS league_groups (
                lineage_id INTEGER PRIMARY KEY AUTOINCREMENT,
                first_league_id INTEGER NOT NULL UNIQUE
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS leagues (
                league_key TEXT PRIMARY KEY,
                league_id INTEGER NOT NULL,
                lineage_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                season INTEGER NOT NULL,
                game_id INTEGER NOT NULL,
                game_key TEXT NOT NULL,
                game_code TEXT NOT NULL,
                registration_over INTEGER NOT NULL,
                game_over INTEGER NOT NULL,
                offseason INTEGER NOT NULL,
                num_teams INTEGER NOT NULL,
                scoring_type TEXT NOT NULL,
                draft_type TEXT NOT NULL,
                uses_playoff INTEGER NOT NULL,
                previous_league_id INTEGER,
                draft_order TEXT NOT NULL,
                draft_started INTEGER NOT NULL,
                FOREIGN KEY (lineage_id) REFERENCES league_groups(lineage_id)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS teams (
                team_key TEXT PRIMARY KEY,
                league_key TEXT NOT NULL,
                team_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                standing INTEGER NOT NULL,
                FOREIGN KEY (league_key) REFERENCES leagues(league_key)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                email TEXT PRIMARY KEY,
                guid TEXT NOT NULL,
                name TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS team_managers (
                team_key TEXT NOT NULL,
                email TEXT NOT NULL,
                is_commissioner INTEGER NOT NULL,
                PRIMARY KEY (team_key, email),
                FOREIGN KEY (team_key) REFERENCES teams(team_key),
                FOREIGN KEY (email) REFERENCES users(email)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS players (
                player_key TEXT PRIMARY KEY,
                player_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                position TEXT NOT NULL,
                team TEXT,
                game_id INTEGER NOT NULL,
                season INTEGER NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS player_stats (
                player_key TEXT NOT NULL,
                season INTEGER NOT NULL,
                week INTEGER NOT NULL,
                stat_id INTEGER NOT NULL,
                value REAL NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                PRIMARY KEY (player_key, season, week, stat_id)
            )",
            [],
        )?;

        // Create indexes for performance
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_leagues_league_id
             ON leagues(league_id)",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_team_managers_email
             ON team_managers(email)",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_players_game_season
             ON players(game_id, season)",
            [],
        )?;

        Ok(())
    }
}
