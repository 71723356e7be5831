//! CLI argument definitions and parsing.

pub mod types;

use clap::{Parser, Subcommand};
use types::{GameId, Guid, Season, Week};

#[derive(Debug, Parser)]
#[clap(name = "fantasy-sync", about = "Fantasy league and player stat import pipeline")]
pub struct FantasySync {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Import every league the user belongs to, grouped by lineage,
    /// and persist the groups.
    ImportLeagues {
        /// User GUID (or set `YAHOO_FANTASY_GUID` env var).
        #[clap(long, short)]
        guid: Option<Guid>,

        /// Print per-group detail when done.
        #[clap(long)]
        verbose: bool,
    },

    /// Import a game's player catalog through the worker pool.
    ///
    /// Queues the fixed page sweep, drains it, and persists every
    /// fetched player.
    ImportPlayers {
        /// User GUID (or set `YAHOO_FANTASY_GUID` env var).
        #[clap(long, short)]
        guid: Option<Guid>,

        /// Provider game ID (e.g. 390).
        #[clap(long)]
        game_id: GameId,

        /// Number of parallel import workers.
        #[clap(long, default_value_t = 4)]
        workers: usize,
    },

    /// Import one week of stats for every stored player of a game.
    ImportStats {
        /// User GUID (or set `YAHOO_FANTASY_GUID` env var).
        #[clap(long, short)]
        guid: Option<Guid>,

        /// Provider game ID (e.g. 390).
        #[clap(long)]
        game_id: GameId,

        /// Season year (e.g. 2025).
        #[clap(long, short, default_value_t = Season::default())]
        season: Season,

        /// Single week.
        #[clap(long, short, default_value_t = Week::default())]
        week: Week,

        /// Number of parallel import workers.
        #[clap(long, default_value_t = 4)]
        workers: usize,
    },
}
