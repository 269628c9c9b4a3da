use std::collections::VecDeque;

use crate::config::GridSize;
use crate::input::Direction;

/// Grid position in logical cell coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the center cell of the grid.
    #[must_use]
    pub fn center(bounds: GridSize) -> Self {
        Self {
            x: i32::from(bounds.width / 2),
            y: i32::from(bounds.height / 2),
        }
    }

    /// Returns the neighbouring position one step along `direction`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        Self {
            x: self.x + direction.dx,
            y: self.y + direction.dy,
        }
    }

    /// Returns true when the position lies inside the bounds.
    #[must_use]
    pub fn is_within_bounds(self, bounds: GridSize) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.x < i32::from(bounds.width)
            && self.y < i32::from(bounds.height)
    }

    /// Returns this position wrapped into bounds on both axes.
    #[must_use]
    pub fn wrapped(self, bounds: GridSize) -> Self {
        Self {
            x: self.x.rem_euclid(i32::from(bounds.width)),
            y: self.y.rem_euclid(i32::from(bounds.height)),
        }
    }
}

/// Ordered snake body, head first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Position>,
}

impl Snake {
    /// Creates a one-cell snake at `start`.
    #[must_use]
    pub fn new(start: Position) -> Self {
        Self {
            body: VecDeque::from([start]),
        }
    }

    /// Creates a snake from explicit body segments (front is head).
    ///
    /// # Panics
    ///
    /// Panics when `segments` is empty.
    #[must_use]
    pub fn from_segments(segments: Vec<Position>) -> Self {
        assert!(!segments.is_empty(), "snake needs at least one segment");
        Self {
            body: VecDeque::from(segments),
        }
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Position {
        *self
            .body
            .front()
            .expect("snake body must always contain at least one segment")
    }

    /// Pushes a new head. The tail stays in place, so the caller decides
    /// whether this step grows the snake.
    pub fn push_head(&mut self, head: Position) {
        self.body.push_front(head);
    }

    /// Drops the tail segment, keeping at least the head.
    pub fn drop_tail(&mut self) {
        if self.body.len() > 1 {
            let _ = self.body.pop_back();
        }
    }

    /// Moves the head to `position` in place, leaving the body untouched.
    pub fn relocate_head(&mut self, position: Position) {
        if let Some(head) = self.body.front_mut() {
            *head = position;
        }
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    /// Returns true if `position` lands on any segment behind the head,
    /// the current tail included.
    #[must_use]
    pub fn body_contains(&self, position: Position) -> bool {
        self.body.iter().skip(1).any(|segment| *segment == position)
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns true when there are no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }

    /// Copies the body into a head-first vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Position> {
        self.body.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::config::GridSize;
    use crate::input::Direction;

    use super::{Position, Snake};

    #[test]
    fn position_wrapping_keeps_coordinates_inside_bounds() {
        let bounds = GridSize {
            width: 10,
            height: 8,
        };

        assert_eq!(Position::new(-1, 3).wrapped(bounds), Position::new(9, 3));
        assert_eq!(Position::new(4, 8).wrapped(bounds), Position::new(4, 0));
        assert_eq!(Position::new(4, 5).wrapped(bounds), Position::new(4, 5));
    }

    #[test]
    fn center_of_even_grid_rounds_down() {
        let bounds = GridSize {
            width: 20,
            height: 20,
        };
        assert_eq!(Position::center(bounds), Position::new(10, 10));
    }

    #[test]
    fn step_follows_direction_delta() {
        let origin = Position::new(5, 5);
        assert_eq!(origin.step(Direction::UP), Position::new(5, 4));
        assert_eq!(origin.step(Direction::RIGHT), Position::new(6, 5));
        assert_eq!(origin.step(Direction::IDLE), origin);
    }

    #[test]
    fn push_then_drop_tail_translates_snake() {
        let mut snake = Snake::from_segments(vec![Position::new(5, 5), Position::new(4, 5)]);

        snake.push_head(Position::new(6, 5));
        snake.drop_tail();

        assert_eq!(snake.to_vec(), vec![Position::new(6, 5), Position::new(5, 5)]);
    }

    #[test]
    fn push_without_drop_grows_snake() {
        let mut snake = Snake::new(Position::new(5, 5));

        snake.push_head(Position::new(6, 5));

        assert_eq!(snake.len(), 2);
        assert_eq!(snake.head(), Position::new(6, 5));
    }

    #[test]
    fn body_check_skips_head_but_includes_tail() {
        let snake = Snake::from_segments(vec![
            Position::new(2, 2),
            Position::new(1, 2),
            Position::new(1, 3),
        ]);

        assert!(!snake.body_contains(Position::new(2, 2)));
        assert!(snake.body_contains(Position::new(1, 3)));
        assert!(snake.occupies(Position::new(2, 2)));
    }

    #[test]
    fn relocating_head_keeps_body() {
        let mut snake = Snake::from_segments(vec![Position::new(0, 5), Position::new(1, 5)]);

        snake.relocate_head(Position::new(10, 10));

        assert_eq!(
            snake.to_vec(),
            vec![Position::new(10, 10), Position::new(1, 5)]
        );
    }

    #[test]
    fn single_segment_never_loses_its_head() {
        let mut snake = Snake::new(Position::new(1, 1));
        snake.drop_tail();
        assert_eq!(snake.len(), 1);
    }
}
