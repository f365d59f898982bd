//! End-of-game score recording through the session and leaderboard services

use std::fs;
use std::path::PathBuf;

use bonus_tetris::core::GameState;
use bonus_tetris::services::{
    FallbackLeaderboard, FixedLocation, GeoLocation, LeaderboardService, LocalLeaderboard,
    NoLocator, PlayerRecord, ServiceError, SessionContext, LOCAL_ORIGIN, PLAYER_ID_FILE,
};
use bonus_tetris::types::{Difficulty, GameAction};

fn scratch(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("bonus-tetris-{}-{name}.json", std::process::id()))
}

fn finished_game(seed: u64) -> GameState {
    let mut game = GameState::new(seed);
    let ticket = game.start(0);
    game.tick(ticket, 61_500);
    for _ in 0..200 {
        if game.is_game_over() {
            break;
        }
        game.apply_action(GameAction::HardDrop, 61_500);
    }
    game
}

/// Remote stand-in that is always down.
struct Offline;

impl LeaderboardService for Offline {
    fn fetch_top_players(
        &mut self,
        _count: usize,
        _difficulty: Difficulty,
    ) -> Result<Vec<PlayerRecord>, ServiceError> {
        Err(ServiceError::Unavailable("offline".to_string()))
    }

    fn fetch_player(
        &mut self,
        _player_id: &str,
    ) -> Result<Option<PlayerRecord>, ServiceError> {
        Err(ServiceError::Unavailable("offline".to_string()))
    }

    fn submit_score(
        &mut self,
        _record: PlayerRecord,
    ) -> Result<PlayerRecord, ServiceError> {
        Err(ServiceError::Unavailable("offline".to_string()))
    }
}

#[test]
fn test_finished_game_is_persisted() {
    let path = scratch("persist");
    let _ = fs::remove_file(&path);

    let game = finished_game(99);
    assert!(game.is_game_over());

    let mut session = SessionContext::new(game.difficulty());
    session.set_name("carla");
    let mut locator = FixedLocation(GeoLocation {
        country: "Chile".to_string(),
        city: "Valparaiso".to_string(),
        latitude: -33.0,
        longitude: -71.6,
        country_flag: String::new(),
    });
    let record = session
        .build_record(game.score(), game.elapsed_ms(), &mut locator)
        .unwrap();
    assert_eq!(record.time, "00:01:01");

    let mut board = FallbackLeaderboard::new(LocalLeaderboard::open(&path).unwrap());
    board.submit_score(record).unwrap();

    let mut reopened = LocalLeaderboard::open(&path).unwrap();
    let top = reopened.fetch_top_players(5, Difficulty::Medium).unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].name, "carla");
    assert_eq!(top[0].city, "Valparaiso");
    assert_eq!(top[0].player_id, session.player_id());

    let mut returning = SessionContext::with_player_id(session.player_id(), Difficulty::Medium);
    assert!(returning.initialize(&mut reopened).unwrap());
    assert_eq!(returning.name(), "carla");

    let _ = fs::remove_file(&path);
}

#[test]
fn test_offline_scores_land_in_local_cache() {
    let mut board = FallbackLeaderboard::new(Offline);
    let mut session = SessionContext::with_player_id("player_1_0.5", Difficulty::Hard);
    session.set_name("dee");

    for score in [300, 1_200, 800] {
        let record = session.build_record(score, 10_000, &mut NoLocator).unwrap();
        let stored = board.submit_score(record).unwrap();
        assert_eq!(stored.country, LOCAL_ORIGIN);
    }

    let status = board.status();
    assert!(status.health_checked);
    assert!(!status.available);

    let top = board.fetch_top_players(5, Difficulty::Hard).unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].score, 1_200);
    assert!(board.fetch_top_players(5, Difficulty::Easy).unwrap().is_empty());
}

#[test]
fn test_unnamed_player_is_not_recorded() {
    let mut board = FallbackLeaderboard::new(LocalLeaderboard::in_memory());
    let mut session = SessionContext::new(Difficulty::Easy);
    assert!(session.build_record(10, 0, &mut NoLocator).is_err());
    assert!(board.fetch_top_players(5, Difficulty::Easy).unwrap().is_empty());
}

#[test]
fn test_returning_player_keeps_id_and_name() {
    let dir = std::env::temp_dir().join(format!("bonus-tetris-{}-returning", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    let scores = dir.join("scores.json");
    let id_file = dir.join(PLAYER_ID_FILE);

    let mut first = SessionContext::load_or_create(&id_file, Difficulty::Easy).unwrap();
    let mut board = LocalLeaderboard::open(&scores).unwrap();
    assert!(!first.initialize(&mut board).unwrap());
    first.set_name("emil");
    let record = first.build_record(700, 30_000, &mut NoLocator).unwrap();
    board.submit_score(record).unwrap();

    // next run of the program
    let mut second = SessionContext::load_or_create(&id_file, Difficulty::Easy).unwrap();
    let mut board = LocalLeaderboard::open(&scores).unwrap();
    assert_eq!(second.player_id(), first.player_id());
    assert!(second.initialize(&mut board).unwrap());
    assert_eq!(second.name(), "emil");

    // a better score replaces the first one instead of adding a new player
    let record = second.build_record(900, 20_000, &mut NoLocator).unwrap();
    board.submit_score(record).unwrap();
    let top = board.fetch_top_players(10, Difficulty::Easy).unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].score, 900);

    let _ = fs::remove_dir_all(&dir);
}
