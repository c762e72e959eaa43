//! End-to-end runs through the public `Game` API with fixed seeds and dt

use dino_dash::config::Config;
use dino_dash::highscores::{HighScoreError, HighScoreStore, JsonFileStore, MemoryStore};
use dino_dash::sim::{
    Command, Flow, Game, GameEngine, GameEvent, GamePhase, Obstacle, ObstacleKind, Player,
};

const DT: f32 = 1.0 / 15.0;

fn new_game(store: Box<dyn HighScoreStore>, seed: u64) -> Game {
    Game::new(Config::default(), store, seed).unwrap()
}

/// Tick without jumping until the runner hits something
fn run_until_game_over(game: &mut Game) -> Vec<Result<(), HighScoreError>> {
    let mut results = Vec::new();
    for _ in 0..(60.0 / DT) as usize {
        results.push(game.tick(DT));
        if game.phase() == GamePhase::GameOver {
            break;
        }
    }
    results
}

#[test]
fn test_idle_runner_eventually_crashes() {
    let mut game = new_game(Box::new(MemoryStore::new(0)), 42);
    game.handle_command(Command::Jump).unwrap();
    run_until_game_over(&mut game);

    assert_eq!(game.phase(), GamePhase::GameOver);
    let score = game.engine().current_score();
    assert!(score > 0);
    assert_eq!(game.engine().high_score(), score);
    assert_eq!(game.engine().store().load().unwrap(), score);

    let events = game.drain_events();
    assert!(events.iter().any(|e| matches!(e, GameEvent::Collision { .. })));
    assert!(events.contains(&GameEvent::NewHighScore { score }));
}

#[test]
fn test_game_over_freezes_world() {
    let mut game = new_game(Box::new(MemoryStore::new(0)), 7);
    game.handle_command(Command::Jump).unwrap();
    run_until_game_over(&mut game);

    let before = game.snapshot();
    for _ in 0..30 {
        game.tick(DT).unwrap();
    }
    let after = game.snapshot();
    assert_eq!(before.score, after.score);
    assert_eq!(before.obstacles, after.obstacles);

    // Jump does nothing after game over
    game.handle_command(Command::Jump).unwrap();
    assert_eq!(game.phase(), GamePhase::GameOver);
}

#[test]
fn test_restart_begins_a_fresh_run() {
    let mut game = new_game(Box::new(MemoryStore::new(0)), 3);
    game.handle_command(Command::Jump).unwrap();
    run_until_game_over(&mut game);
    let high = game.engine().high_score();

    assert_eq!(game.handle_command(Command::Restart).unwrap(), Flow::Continue);
    assert_eq!(game.phase(), GamePhase::Playing);
    assert_eq!(game.engine().current_score(), 0);
    assert_eq!(game.engine().high_score(), high);
    assert_eq!(game.spawner().active_count(), 0);
    assert_eq!(game.spawner().game_time(), 0.0);
    assert!(game.player().is_on_ground());
}

#[test]
fn test_same_seed_same_run() {
    let mut a = new_game(Box::new(MemoryStore::new(0)), 99);
    let mut b = new_game(Box::new(MemoryStore::new(0)), 99);
    for game in [&mut a, &mut b] {
        game.handle_command(Command::Jump).unwrap();
        for i in 0..90 {
            if i % 20 == 0 {
                game.handle_command(Command::Jump).unwrap();
            }
            game.tick(DT).unwrap();
        }
    }
    let (sa, sb) = (a.snapshot(), b.snapshot());
    assert_eq!(sa.obstacles, sb.obstacles);
    assert_eq!(sa.score, sb.score);
    assert_eq!(sa.player, sb.player);
}

#[test]
fn test_save_failure_is_reported_not_fatal() {
    let mut game = new_game(Box::new(MemoryStore::failing(0)), 42);
    game.handle_command(Command::Jump).unwrap();
    let results = run_until_game_over(&mut game);

    assert_eq!(game.phase(), GamePhase::GameOver);
    assert!(matches!(results.last(), Some(Err(HighScoreError::Io(_)))));
    // The loop can keep ticking afterwards
    assert!(game.tick(DT).is_ok());
    assert!(game.engine().high_score() > 0);
}

#[test]
fn test_high_score_survives_restart_of_process() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.json");

    let mut first = new_game(Box::new(JsonFileStore::new(&path)), 5);
    first.handle_command(Command::Jump).unwrap();
    run_until_game_over(&mut first);
    let high = first.engine().high_score();
    assert!(high > 0);

    let second = new_game(Box::new(JsonFileStore::new(&path)), 6);
    assert_eq!(second.engine().high_score(), high);
    assert_eq!(second.snapshot().high_score, high);
}

#[test]
fn test_corrupt_score_file_starts_from_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.json");
    std::fs::write(&path, "garbage").unwrap();

    let game = new_game(Box::new(JsonFileStore::new(&path)), 1);
    assert_eq!(game.engine().high_score(), 0);
}

#[test]
fn test_timed_jump_clears_cactus_and_scores_bonus() {
    let config = Config::default();
    let mut engine = GameEngine::new(config.clone(), Box::new(MemoryStore::new(0))).unwrap();
    let mut player = Player::new(config.ground_line());
    let mut obstacles = vec![Obstacle::new(
        ObstacleKind::CactusSmall,
        40.0,
        config.ground_line(),
        config.obstacle_speed,
    )];
    engine.start().unwrap();

    let dt = 1.0 / 60.0;
    let mut jumped = false;
    for _ in 0..180 {
        if !jumped && obstacles[0].x <= 25.0 {
            jumped = player.jump(config.jump_velocity);
        }
        player.update(dt, config.gravity);
        obstacles[0].update(dt);
        engine.check_collisions(&player, &mut obstacles).unwrap();
        engine.update(dt);
        if !obstacles[0].active {
            break;
        }
    }

    assert!(jumped);
    assert_eq!(engine.phase(), GamePhase::Playing);
    assert_eq!(engine.score().obstacles_passed, 1);
    assert!(engine.current_score() >= 100);
}

#[test]
fn test_quit_from_any_phase() {
    let mut game = new_game(Box::new(MemoryStore::new(0)), 1);
    assert_eq!(game.handle_command(Command::Quit).unwrap(), Flow::Quit);
    game.handle_command(Command::Jump).unwrap();
    assert_eq!(game.handle_command(Command::Quit).unwrap(), Flow::Quit);
}
