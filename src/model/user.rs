//! Deduplicated user/manager model.

use serde::{Deserialize, Serialize};

use crate::cli::types::{Guid, LeagueKey, TeamKey};

/// A manager deduplicated across every league and team in an import.
///
/// Email is the identity key: however many teams reference the same
/// manager, the aggregation consumer resolves them to one `User`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub guid: Guid,
    pub name: String,
    pub teams: Vec<TeamKey>,
    pub commissioned_leagues: Vec<LeagueKey>,
}

impl User {
    pub fn new(email: impl Into<String>, guid: Guid, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            guid,
            name: name.into(),
            teams: Vec::new(),
            commissioned_leagues: Vec::new(),
        }
    }
}
