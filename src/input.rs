use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

/// Movement intent as a unit step on one axis, or idle.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub struct Direction {
    pub dx: i32,
    pub dy: i32,
}

impl Direction {
    pub const IDLE: Self = Self { dx: 0, dy: 0 };
    pub const UP: Self = Self { dx: 0, dy: -1 };
    pub const DOWN: Self = Self { dx: 0, dy: 1 };
    pub const LEFT: Self = Self { dx: -1, dy: 0 };
    pub const RIGHT: Self = Self { dx: 1, dy: 0 };

    /// Builds a direction from a raw delta. Anything other than idle or a
    /// single unit step on one axis is rejected.
    #[must_use]
    pub fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        match (dx, dy) {
            (0, 0) | (0, 1) | (0, -1) | (1, 0) | (-1, 0) => Some(Self { dx, dy }),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_idle(self) -> bool {
        self == Self::IDLE
    }
}

/// Returns whether `next` may replace `current`.
///
/// A change is accepted only when it moves along an axis the snake is not
/// already travelling on, which rules out both reversals and repeats.
#[must_use]
pub fn direction_change_is_valid(current: Direction, next: Direction) -> bool {
    (next.dx != 0 && current.dx == 0) || (next.dy != 0 && current.dy == 0)
}

/// High-level input events produced by the front-end.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameInput {
    Direction(Direction),
    Easier,
    Harder,
    SelectDifficulty(usize),
    Confirm,
    Quit,
}

/// Translates a terminal key press into a game input.
#[must_use]
pub fn map_key(event: KeyEvent) -> Option<GameInput> {
    if event.kind != KeyEventKind::Press {
        return None;
    }

    let input = match event.code {
        KeyCode::Up | KeyCode::Char('w' | 'W' | 'k') => GameInput::Direction(Direction::UP),
        KeyCode::Down | KeyCode::Char('s' | 'S' | 'j') => GameInput::Direction(Direction::DOWN),
        KeyCode::Left | KeyCode::Char('a' | 'A' | 'h') => GameInput::Direction(Direction::LEFT),
        KeyCode::Right | KeyCode::Char('d' | 'D' | 'l') => GameInput::Direction(Direction::RIGHT),
        KeyCode::Char('-') => GameInput::Easier,
        KeyCode::Char('+' | '=') => GameInput::Harder,
        KeyCode::Char(digit @ '1'..='3') => {
            GameInput::SelectDifficulty(usize::from(digit as u8 - b'1'))
        }
        KeyCode::Enter | KeyCode::Char(' ') => GameInput::Confirm,
        KeyCode::Esc | KeyCode::Char('q' | 'Q') => GameInput::Quit,
        _ => return None,
    };

    Some(input)
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

    use super::{direction_change_is_valid, map_key, Direction, GameInput};

    #[test]
    fn reversal_on_moving_axis_is_rejected() {
        assert!(!direction_change_is_valid(Direction::RIGHT, Direction::LEFT));
        assert!(!direction_change_is_valid(Direction::LEFT, Direction::RIGHT));
        assert!(!direction_change_is_valid(Direction::UP, Direction::DOWN));
        assert!(!direction_change_is_valid(Direction::DOWN, Direction::UP));
    }

    #[test]
    fn perpendicular_turns_are_accepted() {
        for current in [Direction::UP, Direction::DOWN] {
            assert!(direction_change_is_valid(current, Direction::LEFT));
            assert!(direction_change_is_valid(current, Direction::RIGHT));
        }
        for current in [Direction::LEFT, Direction::RIGHT] {
            assert!(direction_change_is_valid(current, Direction::UP));
            assert!(direction_change_is_valid(current, Direction::DOWN));
        }
    }

    #[test]
    fn repeats_and_idle_are_rejected() {
        assert!(!direction_change_is_valid(Direction::RIGHT, Direction::RIGHT));
        assert!(!direction_change_is_valid(Direction::UP, Direction::IDLE));
    }

    #[test]
    fn any_direction_leaves_idle() {
        assert!(direction_change_is_valid(Direction::IDLE, Direction::LEFT));
        assert!(direction_change_is_valid(Direction::IDLE, Direction::DOWN));
    }

    #[test]
    fn from_delta_accepts_only_unit_steps() {
        assert_eq!(Direction::from_delta(1, 0), Some(Direction::RIGHT));
        assert_eq!(Direction::from_delta(0, 0), Some(Direction::IDLE));
        assert_eq!(Direction::from_delta(1, 1), None);
        assert_eq!(Direction::from_delta(0, 2), None);
    }

    #[test]
    fn keys_map_to_inputs() {
        let press = |code| KeyEvent::new(code, KeyModifiers::NONE);

        assert_eq!(
            map_key(press(KeyCode::Up)),
            Some(GameInput::Direction(Direction::UP))
        );
        assert_eq!(
            map_key(press(KeyCode::Char('a'))),
            Some(GameInput::Direction(Direction::LEFT))
        );
        assert_eq!(
            map_key(press(KeyCode::Char('3'))),
            Some(GameInput::SelectDifficulty(2))
        );
        assert_eq!(map_key(press(KeyCode::Esc)), Some(GameInput::Quit));
        assert_eq!(map_key(press(KeyCode::Tab)), None);

        let mut release = press(KeyCode::Up);
        release.kind = KeyEventKind::Release;
        assert_eq!(map_key(release), None);
    }
}
