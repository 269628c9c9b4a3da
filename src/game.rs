use std::fmt;
use std::time::Duration;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::clock::SimulationClock;
use crate::config::{
    ConfigError, Difficulty, DifficultyLevel, FOOD_POINTS, GRID, MIN_TICK_INTERVAL,
};
use crate::effects::{ActiveEffects, EffectState, EffectTarget};
use crate::food::{roll_power_up, spawn_food};
use crate::input::{direction_change_is_valid, Direction};
use crate::power_up::{PowerUp, PowerUpKind};
use crate::score::HighScoreStore;
use crate::snake::{Position, Snake};

/// Session lifecycle phase.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum Phase {
    #[default]
    NotStarted,
    Playing,
    GameOver,
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameOverReason {
    WallCollision,
    SelfCollision,
    /// The snake filled every cell, leaving nowhere to put food.
    BoardFull,
}

impl fmt::Display for GameOverReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::WallCollision => "hit the wall",
            Self::SelfCollision => "hit yourself",
            Self::BoardFull => "filled the board",
        })
    }
}

/// One-shot events raised by a tick, for rendering and audio collaborators.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TickEvent {
    FoodEaten { position: Position },
    PowerUpCollected { kind: PowerUpKind },
    /// A lethal collision was absorbed by the shield; the head moved to the center.
    ShieldBlocked,
    GameOver {
        reason: GameOverReason,
        new_high_score: bool,
    },
}

/// State after one tick plus the events that tick produced.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TickResult {
    pub snake: Vec<Position>,
    pub food: Option<Position>,
    pub power_up: Option<PowerUp>,
    pub score: u32,
    pub active_effects: ActiveEffects,
    pub game_over: bool,
    pub events: Vec<TickEvent>,
}

impl TickResult {
    #[must_use]
    pub fn has_event(&self, predicate: impl Fn(&TickEvent) -> bool) -> bool {
        self.events.iter().any(predicate)
    }
}

/// Engine construction parameters.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct EngineConfig {
    /// Seed for food and power-up placement. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

/// Complete mutable state of one game, from start until restart.
#[derive(Debug, Clone)]
pub struct GameSession {
    pub level: DifficultyLevel,
    pub difficulty: Difficulty,
    pub snake: Snake,
    pub direction: Direction,
    pub food: Position,
    pub power_up: Option<PowerUp>,
    pub effects: EffectState,
    pub score: u32,
    pub tick_interval: Duration,
    clock: SimulationClock,
}

impl GameSession {
    fn new(level: DifficultyLevel, difficulty: Difficulty, rng: &mut StdRng) -> Result<Self, ConfigError> {
        let snake = Snake::new(Position::center(GRID));
        let food = spawn_food(rng, GRID, &snake).ok_or(ConfigError::NoRoomForFood)?;

        Ok(Self {
            level,
            difficulty,
            snake,
            direction: Direction::RIGHT,
            food,
            power_up: None,
            effects: EffectState::default(),
            score: 0,
            tick_interval: difficulty.base_speed(),
            clock: SimulationClock::default(),
        })
    }

    /// Applies a collected power-up as of virtual time `now`.
    pub fn apply_power_up(&mut self, kind: PowerUpKind, now: Duration) {
        self.effects.apply(
            kind,
            now,
            EffectTarget {
                tick_interval: &mut self.tick_interval,
                score: &mut self.score,
            },
        );
    }

    /// Returns when the simulation clock fires next, if armed.
    #[must_use]
    pub fn next_tick_at(&self) -> Option<Duration> {
        self.clock.due_at()
    }

    /// Movement and collision for one tick. Returns the reason when the
    /// session must end.
    fn step(
        &mut self,
        rng: &mut StdRng,
        now: Duration,
        events: &mut Vec<TickEvent>,
    ) -> Option<GameOverReason> {
        // Checked before wrapping: a head one step past the edge is a wall hit.
        let raw_head = self.snake.head().step(self.direction);
        let collision = if !raw_head.is_within_bounds(GRID) {
            Some(GameOverReason::WallCollision)
        } else if self.snake.body_contains(raw_head) {
            Some(GameOverReason::SelfCollision)
        } else {
            None
        };

        if let Some(reason) = collision {
            if !self.effects.active().has_shield() {
                return Some(reason);
            }

            debug!("shield absorbed {reason:?} at {raw_head:?}");
            self.snake.relocate_head(Position::center(GRID));
            self.effects.start_blink(now);
            events.push(TickEvent::ShieldBlocked);
            return None;
        }

        let head = raw_head.wrapped(GRID);
        self.snake.push_head(head);

        if head == self.food {
            self.score += FOOD_POINTS;
            self.tick_interval = self
                .tick_interval
                .saturating_sub(self.difficulty.speed_increment())
                .max(MIN_TICK_INTERVAL);
            events.push(TickEvent::FoodEaten { position: head });

            let Some(food) = spawn_food(rng, GRID, &self.snake) else {
                return Some(GameOverReason::BoardFull);
            };
            self.food = food;

            if let Some(power_up) = roll_power_up(rng, GRID, self.difficulty.power_up_spawn_chance) {
                debug!("spawned {} at {:?}", power_up.kind, power_up.position);
                self.power_up = Some(power_up);
            }
        } else if let Some(power_up) = self.power_up.filter(|power_up| power_up.position == head) {
            self.power_up = None;
            self.apply_power_up(power_up.kind, now);
            events.push(TickEvent::PowerUpCollected {
                kind: power_up.kind,
            });
            self.snake.drop_tail();
        } else {
            self.snake.drop_tail();
        }

        None
    }
}

/// The game engine: session lifecycle, input, ticking and the virtual clock.
#[derive(Debug)]
pub struct Game<S: HighScoreStore> {
    phase: Phase,
    session: Option<GameSession>,
    high_score: u32,
    store: S,
    rng: StdRng,
    now: Duration,
}

impl<S: HighScoreStore> Game<S> {
    /// Creates an engine, reading the persisted high score from `store`.
    pub fn new(config: EngineConfig, store: S) -> Self {
        let rng = config
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        let high_score = store.load().unwrap_or_else(|error| {
            warn!("could not load high score, starting from 0: {error}");
            0
        });

        Self {
            phase: Phase::NotStarted,
            session: None,
            high_score,
            store,
            rng,
            now: Duration::ZERO,
        }
    }

    /// Starts a session for a difficulty key such as `"normal"`.
    pub fn start_session(&mut self, key: &str) -> Result<(), ConfigError> {
        let level = key.parse::<DifficultyLevel>()?;
        self.start(level)
    }

    /// Starts a session with one of the predefined tiers.
    pub fn start(&mut self, level: DifficultyLevel) -> Result<(), ConfigError> {
        self.start_with(level, level.settings())
    }

    /// Starts a session with explicit tuning values. Ignored unless no
    /// session is running.
    pub fn start_with(&mut self, level: DifficultyLevel, difficulty: Difficulty) -> Result<(), ConfigError> {
        if self.phase != Phase::NotStarted {
            debug!("start ignored in phase {:?}", self.phase);
            return Ok(());
        }
        difficulty.validate()?;

        let mut session = GameSession::new(level, difficulty, &mut self.rng)?;
        session.clock.arm(self.now, session.tick_interval);
        info!(
            "session started on {level}, tick {}ms, food at {:?}",
            session.tick_interval.as_millis(),
            session.food
        );

        self.session = Some(session);
        self.phase = Phase::Playing;
        Ok(())
    }

    /// Requests a new heading. Returns whether it was applied.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.phase != Phase::Playing {
            return false;
        }
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if !direction_change_is_valid(session.direction, direction) {
            return false;
        }

        session.direction = direction;
        if !session.clock.is_armed() {
            session.clock.arm(self.now, session.tick_interval);
        }
        true
    }

    /// Raw-delta form of [`Game::set_direction`]; malformed deltas are rejected.
    pub fn set_direction_delta(&mut self, dx: i32, dy: i32) -> bool {
        Direction::from_delta(dx, dy).is_some_and(|direction| self.set_direction(direction))
    }

    /// Advances the simulation by exactly one step.
    pub fn tick(&mut self) -> TickResult {
        let mut events = Vec::new();

        if self.phase == Phase::Playing {
            if let Some(session) = self.session.as_mut() {
                if !session.direction.is_idle() {
                    if let Some(reason) = session.step(&mut self.rng, self.now, &mut events) {
                        self.finish(reason, &mut events);
                    }
                }
            }
        }

        self.snapshot(events)
    }

    /// Ends the game after a restart request. Only valid from `GameOver`;
    /// the finished session and all of its pending timers are dropped.
    pub fn restart(&mut self) {
        if self.phase != Phase::GameOver {
            debug!("restart ignored in phase {:?}", self.phase);
            return;
        }

        self.session = None;
        self.phase = Phase::NotStarted;
    }

    /// Moves virtual time forward by `elapsed`, firing due timers and ticks
    /// in time order. Timers due at the same instant as a tick run first.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<TickResult> {
        let target = self.now + elapsed;
        let mut results = Vec::new();

        while let Some(session) = self.session.as_mut() {
            let timer_due = session.effects.next_due().filter(|due| *due <= target);
            let tick_due = if self.phase == Phase::Playing {
                session.clock.due_at().filter(|due| *due <= target)
            } else {
                None
            };

            let timer_first = match (timer_due, tick_due) {
                (Some(timer), Some(tick)) => timer <= tick,
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => break,
            };

            if timer_first {
                let Some(timer) = session.effects.pop_due(target) else {
                    break;
                };
                self.now = self.now.max(timer.due);
                let base_speed = session.difficulty.base_speed();
                session
                    .effects
                    .expire(timer.action, &mut session.tick_interval, base_speed);
                continue;
            }

            let Some(scheduled) = session.clock.take_due(target) else {
                break;
            };
            let idle = session.direction.is_idle();
            self.now = self.now.max(scheduled);
            if !idle {
                results.push(self.tick());
            }

            if self.phase == Phase::Playing {
                if let Some(session) = self.session.as_mut() {
                    // The new wait uses the interval as it stands after this tick.
                    session.clock.arm(scheduled, session.tick_interval);
                }
            }
        }

        self.now = target;
        results
    }

    /// Time until the next timer or tick, if anything is scheduled.
    #[must_use]
    pub fn time_until_next_event(&self) -> Option<Duration> {
        let session = self.session.as_ref()?;
        let tick = if self.phase == Phase::Playing {
            session.clock.due_at()
        } else {
            None
        };

        [session.effects.next_due(), tick]
            .into_iter()
            .flatten()
            .min()
            .map(|due| due.saturating_sub(self.now))
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.session.as_ref().map_or(0, |session| session.score)
    }

    #[must_use]
    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Virtual time since the engine was created.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    #[must_use]
    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut GameSession> {
        self.session.as_mut()
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    fn finish(&mut self, reason: GameOverReason, events: &mut Vec<TickEvent>) {
        self.phase = Phase::GameOver;
        let score = self.score();
        if let Some(session) = self.session.as_mut() {
            session.clock.disarm();
        }

        let new_high_score = score > self.high_score;
        if new_high_score {
            self.high_score = score;
            if let Err(error) = self.store.save(score) {
                warn!("failed to save high score {score}: {error}");
            }
        }

        info!("game over ({reason}), score {score}, high score {}", self.high_score);
        events.push(TickEvent::GameOver {
            reason,
            new_high_score,
        });
    }

    fn snapshot(&self, events: Vec<TickEvent>) -> TickResult {
        let Some(session) = self.session.as_ref() else {
            return TickResult {
                events,
                ..TickResult::default()
            };
        };

        TickResult {
            snake: session.snake.to_vec(),
            food: Some(session.food),
            power_up: session.power_up,
            score: session.score,
            active_effects: session.effects.active().clone(),
            game_over: self.phase == Phase::GameOver,
            events,
        }
    }
}
