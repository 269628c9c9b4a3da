use std::time::Duration;

use power_snake::config::DifficultyLevel;
use power_snake::game::{EngineConfig, Game, GameOverReason, Phase, TickEvent, TickResult};
use power_snake::input::Direction;
use power_snake::power_up::{PowerUp, PowerUpKind};
use power_snake::score::MemoryScoreStore;
use power_snake::snake::{Position, Snake};

fn new_game(seed: u64) -> Game<MemoryScoreStore> {
    Game::new(EngineConfig { seed: Some(seed) }, MemoryScoreStore::default())
}

/// Plays a fixed script of turns against the real-time clock.
fn scripted_run(seed: u64) -> Vec<TickResult> {
    let mut game = new_game(seed);
    game.start_session("easy").expect("easy difficulty is valid");

    let turns = [Direction::UP, Direction::LEFT, Direction::DOWN, Direction::RIGHT];
    let mut results = Vec::new();
    for (round, turn) in turns.iter().cycle().take(12).enumerate() {
        results.extend(game.advance(Duration::from_millis(450)));
        if game.phase() != Phase::Playing {
            break;
        }
        assert!(game.set_direction(*turn), "turn {round} should be accepted");
    }
    results
}

#[test]
fn same_seed_and_inputs_replay_identically() {
    let first = scripted_run(42);
    let second = scripted_run(42);

    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn stepwise_food_collection_and_wall_collision() {
    let mut game = new_game(7);
    game.start(DifficultyLevel::Normal)
        .expect("normal difficulty is valid");

    let session = game.session_mut().expect("session is running");
    assert_eq!(session.snake.to_vec(), vec![Position::new(10, 10)]);
    session.food = Position::new(11, 10);

    let result = game.tick();
    assert_eq!(
        result.snake,
        vec![Position::new(11, 10), Position::new(10, 10)]
    );
    assert_eq!(result.score, 10);
    assert!(!result.snake.contains(&result.food.expect("food is placed")));

    let session = game.session_mut().expect("session is running");
    session.snake = Snake::from_segments(vec![Position::new(1, 5), Position::new(2, 5)]);
    session.food = Position::new(15, 15);
    session.power_up = None;
    assert!(game.set_direction(Direction::UP));
    assert!(game.set_direction(Direction::LEFT));

    let result = game.tick();
    assert_eq!(game.phase(), Phase::Playing);
    assert_eq!(result.snake[0], Position::new(0, 5));

    let result = game.tick();
    assert!(result.game_over);
    assert!(result.has_event(|event| matches!(
        event,
        TickEvent::GameOver {
            reason: GameOverReason::WallCollision,
            ..
        }
    )));
}

#[test]
fn shield_pickup_then_wall_hit_recenters_and_blinks_then_lapses() {
    let mut game = new_game(9);
    game.start(DifficultyLevel::Hard).expect("hard difficulty is valid");

    let session = game.session_mut().expect("session is running");
    session.snake = Snake::from_segments(vec![Position::new(2, 5), Position::new(3, 5)]);
    session.direction = Direction::LEFT;
    session.food = Position::new(15, 15);
    session.power_up = Some(PowerUp::new(PowerUpKind::Shield, Position::new(1, 5)));

    // Hard ticks every 100ms: pick up the shield, step onto x = 0, then hit the wall.
    let results = game.advance(Duration::from_millis(300));
    assert_eq!(results.len(), 3);
    assert!(results[0].has_event(|event| *event
        == TickEvent::PowerUpCollected {
            kind: PowerUpKind::Shield
        }));
    assert!(results[0].active_effects.has_shield());
    assert_eq!(results[1].snake[0], Position::new(0, 5));
    assert!(results[2].has_event(|event| *event == TickEvent::ShieldBlocked));
    assert!(!results[2].game_over);
    assert_eq!(results[2].snake[0], Position::new(10, 10));

    let session = game.session().expect("session is running");
    assert!(session.effects.is_blinking());
    assert_eq!(
        session.effects.notification().map(|notification| notification.kind),
        Some(PowerUpKind::Shield)
    );

    // Freeze movement and let the effect timers run out.
    game.session_mut().expect("session is running").direction = Direction::IDLE;
    game.advance(Duration::from_millis(10_000));

    let session = game.session().expect("session is running");
    assert!(!session.effects.is_blinking());
    assert!(session.effects.notification().is_none());
    assert!(!session.effects.active().has_shield());
    assert_eq!(game.phase(), Phase::Playing);
}

#[test]
fn full_lifecycle_keeps_high_score_across_sessions() {
    let mut game = new_game(3);
    assert_eq!(game.phase(), Phase::NotStarted);

    game.start(DifficultyLevel::Normal)
        .expect("normal difficulty is valid");
    let session = game.session_mut().expect("session is running");
    session.snake = Snake::from_segments(vec![Position::new(17, 0)]);
    session.power_up = Some(PowerUp::new(PowerUpKind::Points, Position::new(18, 0)));
    session.food = Position::new(19, 0);

    let results = game.advance(Duration::from_millis(1000));
    let last = results.last().expect("at least one tick ran");
    assert!(last.game_over);
    assert_eq!(last.score, 60);
    assert_eq!(game.high_score(), 60);
    assert_eq!(game.phase(), Phase::GameOver);

    assert!(game.advance(Duration::from_millis(1000)).is_empty());

    game.restart();
    assert_eq!(game.phase(), Phase::NotStarted);
    assert_eq!(game.score(), 0);
    assert_eq!(game.high_score(), 60);
    assert_eq!(game.time_until_next_event(), None);
}
