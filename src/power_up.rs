use std::fmt;
use std::time::Duration;

use crate::snake::Position;

/// Power-up variants that can appear on the board.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum PowerUpKind {
    Speed,
    Slow,
    Points,
    Shield,
}

impl PowerUpKind {
    /// All kinds, in the order used for uniform random selection.
    pub const ALL: [PowerUpKind; 4] = [Self::Speed, Self::Slow, Self::Points, Self::Shield];

    /// Fixed effect duration. Zero for instantaneous kinds.
    #[must_use]
    pub fn duration(self) -> Duration {
        match self {
            Self::Speed | Self::Slow => Duration::from_millis(5000),
            Self::Points => Duration::ZERO,
            Self::Shield => Duration::from_millis(10_000),
        }
    }

    /// Short message shown when the power-up is collected.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Speed => "Speed up!",
            Self::Slow => "Slowed down!",
            Self::Points => "Bonus +50!",
            Self::Shield => "Shield up!",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Speed => "SPEED",
            Self::Slow => "SLOW",
            Self::Points => "POINTS",
            Self::Shield => "SHIELD",
        }
    }
}

impl fmt::Display for PowerUpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Power-up entity currently active on the board.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub position: Position,
    pub duration: Duration,
}

impl PowerUp {
    /// Creates a power-up with the kind's fixed duration.
    #[must_use]
    pub fn new(kind: PowerUpKind, position: Position) -> Self {
        Self {
            kind,
            position,
            duration: kind.duration(),
        }
    }
}
