//! Manager deduplication across leagues and teams.

use std::collections::HashMap;

use crate::cli::types::{LeagueKey, TeamKey};
use crate::model::{ManagerProfile, User};

/// Lookup map guaranteeing one `User` entity per email, however many
/// teams reference that manager.
///
/// Like the grouper, a directory is owned by the single aggregation
/// consumer; no other task touches it.
#[derive(Debug, Default)]
pub struct UserDirectory {
    by_email: HashMap<String, User>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve or create the user for a manager profile and attach the
    /// team. Commissioner assignments are recorded once per league.
    pub fn record_team(
        &mut self,
        profile: &ManagerProfile,
        team_key: &TeamKey,
        league_key: &LeagueKey,
    ) {
        let user = self
            .by_email
            .entry(profile.email.clone())
            .or_insert_with(|| {
                User::new(profile.email.clone(), profile.guid.clone(), profile.name.clone())
            });

        if !user.teams.contains(team_key) {
            user.teams.push(team_key.clone());
        }

        if profile.is_commissioner && !user.commissioned_leagues.contains(league_key) {
            user.commissioned_leagues.push(league_key.clone());
        }
    }

    pub fn user_count(&self) -> usize {
        self.by_email.len()
    }

    /// Finish dedup, returning users ordered by email for stable output.
    pub fn into_users(self) -> Vec<User> {
        let mut users: Vec<User> = self.by_email.into_values().collect();
        users.sort_by(|a, b| a.email.cmp(&b.email));
        users
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::types::Guid;

    fn profile(email: &str, commissioner: bool) -> ManagerProfile {
        ManagerProfile {
            guid: Guid::new(format!("guid-{email}")),
            email: email.to_string(),
            name: email.split('@').next().unwrap().to_string(),
            is_commissioner: commissioner,
        }
    }

    #[test]
    fn test_one_user_per_email() {
        let mut directory = UserDirectory::new();
        let league_a = LeagueKey::new("390.l.1");
        let league_b = LeagueKey::new("390.l.2");

        directory.record_team(&profile("pat@example.com", false), &TeamKey::new("390.l.1.t.1"), &league_a);
        directory.record_team(&profile("pat@example.com", false), &TeamKey::new("390.l.2.t.4"), &league_b);
        directory.record_team(&profile("sam@example.com", false), &TeamKey::new("390.l.1.t.2"), &league_a);

        assert_eq!(directory.user_count(), 2);

        let users = directory.into_users();
        let pat = users.iter().find(|u| u.email == "pat@example.com").unwrap();
        assert_eq!(pat.teams.len(), 2);
    }

    #[test]
    fn test_commissioner_recorded_once_per_league() {
        let mut directory = UserDirectory::new();
        let league = LeagueKey::new("390.l.1");

        // Same commissioner seen through two teams of the same league.
        directory.record_team(&profile("pat@example.com", true), &TeamKey::new("390.l.1.t.1"), &league);
        directory.record_team(&profile("pat@example.com", true), &TeamKey::new("390.l.1.t.9"), &league);

        let users = directory.into_users();
        assert_eq!(users[0].commissioned_leagues, vec![league]);
    }
}
