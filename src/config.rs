use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Logical grid dimensions passed through the game as a named type.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }
}

/// Side length of the square play field.
pub const GRID_SIZE: u16 = 20;

/// Fixed play field used by every session.
pub const GRID: GridSize = GridSize {
    width: GRID_SIZE,
    height: GRID_SIZE,
};

/// Points awarded for each food eaten.
pub const FOOD_POINTS: u32 = 10;

/// Points awarded by the `Points` power-up.
pub const POWER_UP_BONUS_POINTS: u32 = 50;

/// Floor for the food-driven tick interval speed-up.
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Tick interval multiplier (numerator, denominator) applied by the `Speed` power-up: 0.7.
pub const SPEED_BOOST_FACTOR: (u32, u32) = (7, 10);

/// Tick interval multiplier (numerator, denominator) applied by the `Slow` power-up: 1.5.
pub const SLOW_DOWN_FACTOR: (u32, u32) = (3, 2);

/// How long a pickup notification stays visible.
pub const NOTIFICATION_LIFETIME: Duration = Duration::from_millis(2000);

/// How long the head blinks after a shield absorbs a collision.
pub const SHIELD_BLINK_DURATION: Duration = Duration::from_millis(500);

/// Key under which the high score is persisted.
pub const GAME_IDENTITY: &str = "power-snake";

/// Precondition violations reported when a session is started.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("unknown difficulty `{0}` (expected easy, normal or hard)")]
    UnknownDifficulty(String),
    #[error("base speed must be positive")]
    NonPositiveSpeed,
    #[error("initial length must be at least 1")]
    EmptySnake,
    #[error("power-up spawn chance {0} is outside (0, 1]")]
    SpawnChanceOutOfRange(f64),
    #[error("the grid has no free cell for food")]
    NoRoomForFood,
}

/// Tuning values for one difficulty tier.
///
/// `initial_length` is part of each preset and must be at least 1, but it
/// does not size the snake: every session starts with a single segment at
/// the grid center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Difficulty {
    /// Tick interval at session start, in milliseconds.
    pub base_speed_ms: u64,
    /// Milliseconds shaved off the tick interval per food eaten.
    pub speed_increment_ms: u64,
    /// Preset starting length, validated only.
    pub initial_length: usize,
    /// Probability that eating food also spawns a power-up.
    pub power_up_spawn_chance: f64,
}

impl Difficulty {
    #[must_use]
    pub fn base_speed(&self) -> Duration {
        Duration::from_millis(self.base_speed_ms)
    }

    #[must_use]
    pub fn speed_increment(&self) -> Duration {
        Duration::from_millis(self.speed_increment_ms)
    }

    /// Checks the values a session relies on before it starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_speed_ms == 0 {
            return Err(ConfigError::NonPositiveSpeed);
        }
        if self.initial_length == 0 {
            return Err(ConfigError::EmptySnake);
        }
        let chance = self.power_up_spawn_chance;
        if !(chance > 0.0 && chance <= 1.0) {
            return Err(ConfigError::SpawnChanceOutOfRange(chance));
        }
        Ok(())
    }
}

/// The three predefined difficulty tiers.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default, clap::ValueEnum)]
pub enum DifficultyLevel {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl DifficultyLevel {
    pub const ALL: [DifficultyLevel; 3] = [Self::Easy, Self::Normal, Self::Hard];

    /// Returns the tuning values for this tier.
    #[must_use]
    pub fn settings(self) -> Difficulty {
        match self {
            Self::Easy => Difficulty {
                base_speed_ms: 150,
                speed_increment_ms: 5,
                initial_length: 3,
                power_up_spawn_chance: 0.4,
            },
            Self::Normal => Difficulty {
                base_speed_ms: 120,
                speed_increment_ms: 8,
                initial_length: 4,
                power_up_spawn_chance: 0.2,
            },
            Self::Hard => Difficulty {
                base_speed_ms: 100,
                speed_increment_ms: 10,
                initial_length: 5,
                power_up_spawn_chance: 0.1,
            },
        }
    }

    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Normal => "normal",
            Self::Hard => "hard",
        }
    }

    /// Next tier in menu order, saturating at `Hard`.
    #[must_use]
    pub fn harder(self) -> Self {
        match self {
            Self::Easy => Self::Normal,
            Self::Normal | Self::Hard => Self::Hard,
        }
    }

    /// Previous tier in menu order, saturating at `Easy`.
    #[must_use]
    pub fn easier(self) -> Self {
        match self {
            Self::Hard => Self::Normal,
            Self::Normal | Self::Easy => Self::Easy,
        }
    }
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for DifficultyLevel {
    type Err = ConfigError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.key().eq_ignore_ascii_case(key.trim()))
            .ok_or_else(|| ConfigError::UnknownDifficulty(key.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, Difficulty, DifficultyLevel, GRID};

    #[test]
    fn presets_are_valid() {
        for level in DifficultyLevel::ALL {
            assert_eq!(level.settings().validate(), Ok(()), "{level}");
        }
    }

    #[test]
    fn difficulty_keys_parse_case_insensitively() {
        assert_eq!("easy".parse::<DifficultyLevel>(), Ok(DifficultyLevel::Easy));
        assert_eq!("Normal".parse::<DifficultyLevel>(), Ok(DifficultyLevel::Normal));
        assert_eq!(" HARD ".parse::<DifficultyLevel>(), Ok(DifficultyLevel::Hard));
        assert_eq!(
            "nightmare".parse::<DifficultyLevel>(),
            Err(ConfigError::UnknownDifficulty("nightmare".to_owned()))
        );
    }

    #[test]
    fn misconfigured_difficulty_is_rejected() {
        let base = DifficultyLevel::Normal.settings();

        let stalled = Difficulty {
            base_speed_ms: 0,
            ..base
        };
        assert_eq!(stalled.validate(), Err(ConfigError::NonPositiveSpeed));

        let never = Difficulty {
            power_up_spawn_chance: 0.0,
            ..base
        };
        assert_eq!(
            never.validate(),
            Err(ConfigError::SpawnChanceOutOfRange(0.0))
        );

        let always = Difficulty {
            power_up_spawn_chance: 1.0,
            ..base
        };
        assert_eq!(always.validate(), Ok(()));
    }

    #[test]
    fn menu_cycling_saturates() {
        assert_eq!(DifficultyLevel::Hard.harder(), DifficultyLevel::Hard);
        assert_eq!(DifficultyLevel::Easy.easier(), DifficultyLevel::Easy);
        assert_eq!(DifficultyLevel::Easy.harder(), DifficultyLevel::Normal);
    }

    #[test]
    fn grid_is_twenty_by_twenty() {
        assert_eq!(GRID.total_cells(), 400);
    }
}
