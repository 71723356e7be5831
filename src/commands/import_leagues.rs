//! League import command implementation

use std::sync::Arc;

use crate::{
    aggregate::{save_league_groups, LeagueAggregator},
    cli::types::Guid,
    storage::{FantasyDatabase, SqliteStore},
    yahoo::YahooProvider,
    Result,
};

use super::resolve_guid;

/// Handle the import-leagues command
pub async fn handle_import_leagues(guid: Option<Guid>, verbose: bool) -> Result<()> {
    let guid = resolve_guid(guid)?;

    println!("Importing leagues for {}...", guid);

    let provider = Arc::new(YahooProvider::new(reqwest::Client::new()));
    let aggregator = LeagueAggregator::new(provider);
    let import = aggregator.import_leagues_for_user(&guid).await?;

    let league_count: usize = import.groups.iter().map(|group| group.leagues.len()).sum();
    println!(
        "✓ Imported {} leagues in {} lineage groups ({} managers)",
        league_count,
        import.groups.len(),
        import.users.len()
    );

    if verbose {
        for group in &import.groups {
            let seasons: Vec<String> = group
                .leagues
                .iter()
                .map(|league| league.game.season.to_string())
                .collect();
            println!(
                "  lineage {}: {} ({})",
                group.first_league_id,
                group
                    .leagues
                    .last()
                    .map(|league| league.name.as_str())
                    .unwrap_or("<empty>"),
                seasons.join(", ")
            );
        }
    }

    let store = Arc::new(SqliteStore::new(FantasyDatabase::new()?));
    let saved = save_league_groups(store, &import.groups).await;

    println!("✓ Persisted {}/{} league groups", saved, import.groups.len());

    Ok(())
}
