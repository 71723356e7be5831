//! Draft model: results, candidates and draft styles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::cli::types::{Guid, LeagueKey, PlayerKey, TeamKey};
use crate::error::SyncError;

/// Draft style a league is configured with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftType {
    /// Order reverses every other round.
    Snake,
    /// Same order every round.
    #[default]
    Traditional,
}

impl fmt::Display for DraftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DraftType::Snake => write!(f, "snake"),
            DraftType::Traditional => write!(f, "traditional"),
        }
    }
}

impl FromStr for DraftType {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, SyncError> {
        match s.to_ascii_lowercase().as_str() {
            "snake" => Ok(DraftType::Snake),
            "traditional" | "live" | "auction" => Ok(DraftType::Traditional),
            other => Err(SyncError::ProviderFetch {
                resource: "draft type".to_string(),
                message: format!("unrecognized draft type {other:?}"),
            }),
        }
    }
}

/// A completed pick. Append-only; ordering in (round, pick) per league
/// must be strictly monotonic with no duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftResult {
    pub user_guid: Guid,
    pub player_key: PlayerKey,
    pub league_key: LeagueKey,
    pub team_key: TeamKey,
    pub round: u32,
    pub pick: u32,
    /// Seconds since the epoch when the pick was submitted.
    pub timestamp: i64,
}

/// A pick being submitted for validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickCandidate {
    pub user_id: Guid,
    pub player_key: PlayerKey,
    pub team_key: TeamKey,
    /// 1-based overall pick number this candidate claims.
    pub order: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_type_parsing() {
        assert_eq!("snake".parse::<DraftType>().unwrap(), DraftType::Snake);
        assert_eq!("Snake".parse::<DraftType>().unwrap(), DraftType::Snake);
        assert_eq!(
            "live".parse::<DraftType>().unwrap(),
            DraftType::Traditional
        );
        assert!("bananas".parse::<DraftType>().is_err());
    }
}
