//! Type-safe wrappers for provider identifiers.

pub mod ids;
pub mod keys;
pub mod time;

pub use ids::{GameId, LeagueId};
pub use keys::{Guid, LeagueKey, PlayerKey, TeamKey};
pub use time::{Season, Week};
