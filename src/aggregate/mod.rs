//! League aggregation: bounded fan-out over the provider, fan-in
//! through a single consumer that owns all grouping and dedup state.

pub mod dedup;
pub mod lineage;

use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, error, warn};

use crate::cli::types::Guid;
use crate::error::{Result, SyncError};
use crate::model::{
    Game, GameFlags, League, LeagueGroup, LeagueSettings, ManagerProfile, Team, User,
};
use crate::provider::{
    LeagueProvider, LeagueRef, LeagueSettingsRecord, PersistencePort, TeamRecord,
};

use dedup::UserDirectory;
use lineage::{FetchedLeague, LeagueGrouper};

/// Upper bound on concurrent per-league fetches.
pub const DEFAULT_FETCH_CONCURRENCY: usize = 8;

/// Everything one import produces: lineage groups plus the deduplicated
/// manager set the consumer built along the way.
#[derive(Debug, Default)]
pub struct LeagueImport {
    pub groups: Vec<LeagueGroup>,
    pub users: Vec<User>,
}

/// Fans out per-league fetches and funnels the results through one
/// aggregation consumer.
pub struct LeagueAggregator<P> {
    provider: Arc<P>,
    max_in_flight: usize,
}

impl<P: LeagueProvider + 'static> LeagueAggregator<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self {
            provider,
            max_in_flight: DEFAULT_FETCH_CONCURRENCY,
        }
    }

    /// Override the fetch fan-out bound.
    pub fn with_concurrency(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    /// Import every league the user belongs to, grouped by lineage.
    ///
    /// One worker per league fetches settings and standings under a
    /// semaphore bound and sends the assembled league to the consumer.
    /// The consumer alone mutates grouping and dedup state. A failed
    /// league fetch is logged and dropped; the import carries on.
    pub async fn import_leagues_for_user(&self, guid: &Guid) -> Result<LeagueImport> {
        let refs = self.provider.fetch_user_leagues(guid).await?;
        if refs.is_empty() {
            return Ok(LeagueImport::default());
        }

        let (tx, mut rx) = mpsc::channel::<FetchedLeague>(refs.len());

        let consumer = tokio::spawn(async move {
            let mut grouper = LeagueGrouper::new();
            let mut directory = UserDirectory::new();

            while let Some(fetched) = rx.recv().await {
                for team in &fetched.league.teams {
                    for manager in &team.managers {
                        directory.record_team(manager, &team.key, &fetched.league.key);
                    }
                }
                grouper.insert(fetched);
            }

            (grouper.into_groups(), directory.into_users())
        });

        let semaphore = Arc::new(Semaphore::new(self.max_in_flight));
        let mut workers = Vec::with_capacity(refs.len());

        for league_ref in refs {
            let provider = Arc::clone(&self.provider);
            let semaphore = Arc::clone(&semaphore);
            let tx = tx.clone();

            workers.push(tokio::spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return;
                };

                match fetch_league(provider.as_ref(), &league_ref).await {
                    Ok(fetched) => {
                        debug!(league = %fetched.league.key, "fetched league");
                        let _ = tx.send(fetched).await;
                    }
                    Err(err) => {
                        warn!(
                            league = %league_ref.league_key,
                            error = %err,
                            "dropping league after fetch failure"
                        );
                    }
                }
            }));
        }

        // The consumer's channel closes once every worker clone drops.
        drop(tx);

        for worker in workers {
            if let Err(err) = worker.await {
                error!(error = %err, "league fetch task panicked");
            }
        }

        let (groups, users) = consumer.await.map_err(|err| SyncError::ProviderFetch {
            resource: "league aggregation".to_string(),
            message: err.to_string(),
        })?;

        Ok(LeagueImport { groups, users })
    }
}

/// Fetch settings then standings for one league and assemble the record.
async fn fetch_league<P: LeagueProvider>(
    provider: &P,
    league_ref: &LeagueRef,
) -> Result<FetchedLeague> {
    let settings = provider.fetch_league_settings(&league_ref.league_key).await?;
    let teams = provider.fetch_league_standings(&league_ref.league_key).await?;
    Ok(assemble_league(league_ref, settings, teams))
}

fn assemble_league(
    league_ref: &LeagueRef,
    settings: LeagueSettingsRecord,
    teams: Vec<TeamRecord>,
) -> FetchedLeague {
    let game = Game {
        id: league_ref.game_id,
        key: league_ref.game_key.clone(),
        season: league_ref.season,
        code: league_ref.game_code.clone(),
        flags: GameFlags {
            registration_over: league_ref.registration_over,
            game_over: league_ref.game_over,
            offseason: league_ref.offseason,
        },
    };

    let league = League {
        key: league_ref.league_key.clone(),
        id: league_ref.league_id,
        name: settings.name,
        settings: LeagueSettings {
            num_teams: settings.num_teams,
            scoring_type: settings.scoring_type,
            draft_type: settings.draft_type.parse().unwrap_or_default(),
            uses_playoff: settings.uses_playoff,
        },
        teams: teams.into_iter().map(team_from_record).collect(),
        game,
        previous_league_id: None,
        draft_order: settings.draft_order,
        draft_started: settings.draft_started,
    };

    FetchedLeague {
        league,
        lineage_ref: settings.renew,
    }
}

fn team_from_record(record: TeamRecord) -> Team {
    Team {
        key: record.team_key,
        id: record.team_id,
        name: record.name,
        standing: record.standing,
        managers: record
            .managers
            .into_iter()
            .map(|manager| ManagerProfile {
                guid: manager.guid,
                email: manager.email,
                name: manager.nickname,
                is_commissioner: manager.is_commissioner,
            })
            .collect(),
    }
}

/// Persist groups independently and in parallel, one task per group.
///
/// A group that fails to persist is logged and skipped; the others are
/// unaffected. Returns how many groups were saved.
pub async fn save_league_groups(
    store: Arc<dyn PersistencePort>,
    groups: &[LeagueGroup],
) -> usize {
    let tasks: Vec<_> = groups
        .iter()
        .cloned()
        .map(|group| {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                match store.save_league_group(&group).await {
                    Ok(()) => true,
                    Err(err) => {
                        error!(
                            first_league = %group.first_league_id,
                            error = %err,
                            "failed to persist league group"
                        );
                        false
                    }
                }
            })
        })
        .collect();

    futures::future::join_all(tasks)
        .await
        .into_iter()
        .filter(|saved| matches!(saved, Ok(true)))
        .count()
}
