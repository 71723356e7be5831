//! Lineage reconstruction from the provider's weak back-references.

use std::collections::HashMap;

use crate::cli::types::{GameId, LeagueId};
use crate::model::{League, LeagueGroup};

/// A league as the fetch workers hand it to the aggregation consumer:
/// assembled, but not yet assigned to a lineage group.
#[derive(Debug, Clone)]
pub struct FetchedLeague {
    pub league: League,
    /// Raw lineage back-reference from the league settings.
    pub lineage_ref: String,
}

/// Parse a lineage back-reference of the form `"<gameID>_<leagueID>"`.
///
/// Anything that does not split into two numeric halves is treated as
/// "no prior season" rather than an error; the source data is weak and
/// frequently empty.
pub fn parse_lineage_ref(renew: &str) -> Option<(GameId, LeagueId)> {
    let (game, league) = renew.split_once('_')?;
    let game = game.parse::<u32>().ok()?;
    let league = league.parse::<u64>().ok()?;
    Some((GameId::new(game), LeagueId::new(league)))
}

/// Owns all grouping state for one import.
///
/// Only the aggregation consumer ever touches a grouper, so no locking
/// is needed: ownership by one task replaces a shared-map lock.
#[derive(Debug, Default)]
pub struct LeagueGrouper {
    groups: Vec<LeagueGroup>,
    /// league id -> index into `groups`. Entries are set exactly once
    /// and never reassigned.
    membership: HashMap<LeagueId, usize>,
}

impl LeagueGrouper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a fetched league to its lineage group, creating the group
    /// if this is the first member seen.
    ///
    /// A parsable back-reference keys the group by the prior league id
    /// and records it as `previous_league_id`. A league with no
    /// parsable reference roots its own group, keyed by its own id, so
    /// later seasons that point back at it land in the same group
    /// regardless of arrival order.
    pub fn insert(&mut self, fetched: FetchedLeague) {
        let mut league = fetched.league;

        let group_key = match parse_lineage_ref(&fetched.lineage_ref) {
            Some((_, prior_id)) => {
                league.previous_league_id = Some(prior_id);
                prior_id
            }
            None => league.id,
        };

        let index = match self.membership.get(&group_key) {
            Some(&index) => index,
            None => {
                let index = self.groups.len();
                self.groups.push(LeagueGroup::new(group_key));
                self.membership.insert(group_key, index);
                index
            }
        };

        // Register the member's own id so descendants that reference it
        // join the same group. Never reassign an existing entry.
        self.membership.entry(league.id).or_insert(index);

        self.groups[index].leagues.push(league);
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Finish grouping: each group's leagues sorted ascending by season.
    pub fn into_groups(mut self) -> Vec<LeagueGroup> {
        for group in &mut self.groups {
            group.leagues.sort_by_key(|league| league.game.season);
        }
        self.groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lineage_ref_well_formed() {
        let (game, league) = parse_lineage_ref("390_12345").unwrap();
        assert_eq!(game, GameId::new(390));
        assert_eq!(league, LeagueId::new(12345));
    }

    #[test]
    fn test_parse_lineage_ref_rejects_malformed() {
        assert!(parse_lineage_ref("").is_none());
        assert!(parse_lineage_ref("390").is_none());
        assert!(parse_lineage_ref("390_").is_none());
        assert!(parse_lineage_ref("_12345").is_none());
        assert!(parse_lineage_ref("390_twelve").is_none());
        assert!(parse_lineage_ref("nfl_12345").is_none());
    }
}
