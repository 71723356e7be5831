//! Fantasy Sync Pipeline Library
//!
//! Ingests a user's hierarchical fantasy-sports data (games → leagues →
//! teams → managers) from a provider, normalizes it into deduplicated
//! league lineages, and runs an asynchronous worker pipeline that
//! imports per-player statistics at scale.
//!
//! ## Features
//!
//! - **League Aggregation**: Concurrent per-league fetches funneled
//!   through a single consumer that reconstructs multi-season lineage
//!   groups and deduplicates managers by email
//! - **Stat Import Pipeline**: Topic queues and a worker pool that
//!   resolve cached per-user credentials and persist player catalogs
//!   and weekly stats
//! - **Draft Turn Validation**: Pure turn-order arithmetic for snake
//!   and traditional drafts, including commissioner overrides
//! - **Local Storage**: SQLite persistence of lineages, teams,
//!   managers, players and stats
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use fantasy_sync::{aggregate::LeagueAggregator, yahoo::YahooProvider, Guid};
//!
//! # async fn example() -> fantasy_sync::Result<()> {
//! let provider = Arc::new(YahooProvider::new(reqwest::Client::new()));
//! let aggregator = LeagueAggregator::new(provider);
//!
//! let import = aggregator.import_leagues_for_user(&Guid::new("ABC123")).await?;
//! for group in &import.groups {
//!     println!("lineage {} spans {} seasons", group.first_league_id, group.leagues.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Configuration
//!
//! Set your provider GUID and OAuth token to avoid passing them in
//! every command:
//! ```bash
//! export YAHOO_FANTASY_GUID=ABC123
//! export YAHOO_FANTASY_TOKEN=...
//! ```

pub mod aggregate;
pub mod cli;
pub mod commands;
pub mod draft;
pub mod error;
pub mod model;
pub mod provider;
pub mod queue;
pub mod storage;
pub mod worker;
pub mod yahoo;

// Re-export commonly used types
pub use cli::types::{GameId, Guid, LeagueId, LeagueKey, PlayerKey, Season, TeamKey, Week};
pub use error::{Result, SyncError};
pub use model::{DraftType, League, LeagueGroup, User};

pub const GUID_ENV_VAR: &str = "YAHOO_FANTASY_GUID";
