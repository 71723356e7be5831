//! Domain model for the fantasy sync pipeline.

pub mod draft;
pub mod import;
pub mod league;
pub mod player;
pub mod user;

pub use draft::{DraftResult, DraftType, PickCandidate};
pub use import::{
    ImportMessage, ImportPlayer, ImportPlayerStat, PLAYER_PAGE_COUNT, PLAYER_PAGE_SIZE,
    PLAYER_PAGE_TOPIC, PLAYER_STAT_TOPIC,
};
pub use league::{Game, GameFlags, League, LeagueGroup, LeagueSettings, ManagerProfile, Team};
pub use player::{Player, PlayerStat};
pub use user::User;
