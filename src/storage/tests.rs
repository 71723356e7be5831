use super::schema::FantasyDatabase;
use crate::cli::types::{GameId, Guid, LeagueId, LeagueKey, PlayerKey, Season, TeamKey, Week};
use crate::model::{
    Game, GameFlags, League, LeagueGroup, LeagueSettings, ManagerProfile, Player, PlayerStat, Team,
};

fn test_db() -> FantasyDatabase {
    FantasyDatabase::new_in_memory().unwrap()
}

fn test_league(league_id: u64, season: u16) -> League {
    League {
        key: LeagueKey::new(format!("390.l.{league_id}")),
        id: LeagueId::new(league_id),
        name: format!("League {league_id}"),
        settings: LeagueSettings {
            num_teams: 10,
            scoring_type: "head".to_string(),
            draft_type: crate::model::DraftType::Snake,
            uses_playoff: true,
        },
        teams: vec![Team {
            key: TeamKey::new(format!("390.l.{league_id}.t.1")),
            id: 1,
            name: "Team One".to_string(),
            standing: 3,
            managers: vec![ManagerProfile {
                guid: Guid::new("MANAGER1"),
                email: "pat@example.com".to_string(),
                name: "pat".to_string(),
                is_commissioner: true,
            }],
        }],
        game: Game {
            id: GameId::new(390),
            key: "390".to_string(),
            season: Season::new(season),
            code: "nfl".to_string(),
            flags: GameFlags::default(),
        },
        previous_league_id: None,
        draft_order: vec![Guid::new("MANAGER1")],
        draft_started: true,
    }
}

fn test_group(first_league_id: u64, leagues: Vec<League>) -> LeagueGroup {
    LeagueGroup {
        first_league_id: LeagueId::new(first_league_id),
        leagues,
    }
}

#[test]
fn test_database_creation() {
    let _db = test_db();
    // Should not panic - database creation successful
}

#[test]
fn test_open_at_creates_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("fantasy.db");

    let mut db = FantasyDatabase::open_at(&path).unwrap();
    db.upsert_league_group(&test_group(12345, vec![test_league(12345, 2019)]))
        .unwrap();

    assert!(path.exists());

    // Reopening sees the persisted lineage.
    let reopened = FantasyDatabase::open_at(&path).unwrap();
    assert!(reopened
        .lineage_for_first_league(LeagueId::new(12345))
        .unwrap()
        .is_some());
}

#[test]
fn test_upsert_league_group_mints_lineage() {
    let mut db = test_db();
    let group = test_group(12345, vec![test_league(12345, 2019)]);

    let lineage_id = db.upsert_league_group(&group).unwrap();
    assert_eq!(
        db.lineage_for_first_league(LeagueId::new(12345)).unwrap(),
        Some(lineage_id)
    );
}

#[test]
fn test_repeated_upsert_reuses_lineage() {
    let mut db = test_db();
    let group = test_group(12345, vec![test_league(12345, 2019)]);

    let first = db.upsert_league_group(&group).unwrap();

    // Next season the same lineage arrives with a new member league.
    let mut next = test_league(777, 2020);
    next.previous_league_id = Some(LeagueId::new(12345));
    let group = test_group(12345, vec![test_league(12345, 2019), next]);

    let second = db.upsert_league_group(&group).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_distinct_lineages_get_distinct_ids() {
    let mut db = test_db();

    let first = db
        .upsert_league_group(&test_group(111, vec![test_league(111, 2019)]))
        .unwrap();
    let second = db
        .upsert_league_group(&test_group(222, vec![test_league(222, 2019)]))
        .unwrap();

    assert_ne!(first, second);
}

#[test]
fn test_get_teams_for_managers() {
    let mut db = test_db();
    db.upsert_league_group(&test_group(12345, vec![test_league(12345, 2019)]))
        .unwrap();

    let leagues = db.get_teams_for_managers(&Guid::new("MANAGER1")).unwrap();
    assert_eq!(leagues.len(), 1);
    assert_eq!(leagues[0].id, LeagueId::new(12345));
    assert_eq!(leagues[0].teams.len(), 1);
    assert_eq!(leagues[0].teams[0].managers[0].email, "pat@example.com");
    assert!(leagues[0].teams[0].managers[0].is_commissioner);

    let none = db.get_teams_for_managers(&Guid::new("NOBODY")).unwrap();
    assert!(none.is_empty());
}

#[test]
fn test_upsert_players_and_keys_for_game() {
    let mut db = test_db();

    let players = vec![
        Player {
            key: PlayerKey::new("390.p.100"),
            player_id: 100,
            name: "Player A".to_string(),
            position: "QB".to_string(),
            team: Some("KC".to_string()),
            game_id: GameId::new(390),
            season: Season::new(2019),
        },
        Player {
            key: PlayerKey::new("390.p.200"),
            player_id: 200,
            name: "Player B".to_string(),
            position: "RB".to_string(),
            team: None,
            game_id: GameId::new(390),
            season: Season::new(2019),
        },
    ];

    db.upsert_players(&players).unwrap();
    assert_eq!(db.player_count().unwrap(), 2);

    let keys = db
        .player_keys_for_game(GameId::new(390), Season::new(2019))
        .unwrap();
    assert_eq!(
        keys,
        vec![PlayerKey::new("390.p.100"), PlayerKey::new("390.p.200")]
    );

    // Re-importing the same page must not duplicate the catalog.
    db.upsert_players(&players).unwrap();
    assert_eq!(db.player_count().unwrap(), 2);
}

#[test]
fn test_upsert_player_stats_overwrites_value() {
    let mut db = test_db();

    let stat = PlayerStat {
        player_key: PlayerKey::new("390.p.100"),
        season: Season::new(2019),
        week: Week::new(3),
        stat_id: 4,
        value: 210.0,
    };
    db.upsert_player_stats(&[stat.clone()]).unwrap();
    assert_eq!(db.stat_count().unwrap(), 1);

    let corrected = PlayerStat {
        value: 287.0,
        ..stat
    };
    db.upsert_player_stats(&[corrected]).unwrap();
    assert_eq!(db.stat_count().unwrap(), 1);
}
