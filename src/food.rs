use rand::Rng;

use crate::config::GridSize;
use crate::power_up::{PowerUp, PowerUpKind};
use crate::snake::{Position, Snake};

/// Picks a food cell uniformly among the cells the snake does not occupy.
///
/// Returns `None` when the snake fills the whole board.
#[must_use]
pub fn spawn_food<R: Rng + ?Sized>(rng: &mut R, bounds: GridSize, snake: &Snake) -> Option<Position> {
    let mut candidates = Vec::with_capacity(bounds.total_cells().saturating_sub(snake.len()));

    for y in 0..i32::from(bounds.height) {
        for x in 0..i32::from(bounds.width) {
            let position = Position { x, y };
            if !snake.occupies(position) {
                candidates.push(position);
            }
        }
    }

    if candidates.is_empty() {
        return None;
    }

    let index = rng.gen_range(0..candidates.len());
    Some(candidates[index])
}

/// Rolls for a power-up after food is eaten.
///
/// With probability `spawn_chance` a uniformly chosen kind is placed on a
/// uniformly chosen cell. The cell is not checked against the snake or the
/// food, so a power-up may share a cell with either.
#[must_use]
pub fn roll_power_up<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: GridSize,
    spawn_chance: f64,
) -> Option<PowerUp> {
    if !rng.gen_bool(spawn_chance.clamp(0.0, 1.0)) {
        return None;
    }

    let kind = PowerUpKind::ALL[rng.gen_range(0..PowerUpKind::ALL.len())];
    let position = Position {
        x: rng.gen_range(0..i32::from(bounds.width)),
        y: rng.gen_range(0..i32::from(bounds.height)),
    };

    Some(PowerUp::new(kind, position))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::config::GridSize;
    use crate::power_up::PowerUpKind;
    use crate::snake::{Position, Snake};

    use super::{roll_power_up, spawn_food};

    const SMALL: GridSize = GridSize {
        width: 8,
        height: 6,
    };

    #[test]
    fn food_spawn_never_overlaps_snake() {
        let mut rng = StdRng::seed_from_u64(7);
        let snake = Snake::from_segments(vec![
            Position::new(0, 0),
            Position::new(1, 0),
            Position::new(2, 0),
        ]);

        for _ in 0..100 {
            let food = spawn_food(&mut rng, SMALL, &snake).expect("board has free cells");
            assert!(!snake.occupies(food));
            assert!(food.is_within_bounds(SMALL));
        }
    }

    #[test]
    fn food_spawn_finds_last_free_cell() {
        let bounds = GridSize {
            width: 2,
            height: 2,
        };
        let snake = Snake::from_segments(vec![
            Position::new(0, 0),
            Position::new(1, 0),
            Position::new(1, 1),
        ]);
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(spawn_food(&mut rng, bounds, &snake), Some(Position::new(0, 1)));
    }

    #[test]
    fn food_spawn_on_full_board_returns_none() {
        let bounds = GridSize {
            width: 2,
            height: 1,
        };
        let snake = Snake::from_segments(vec![Position::new(0, 0), Position::new(1, 0)]);
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(spawn_food(&mut rng, bounds, &snake), None);
    }

    #[test]
    fn certain_chance_always_spawns_inside_bounds() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut kinds = HashSet::new();

        for _ in 0..200 {
            let power_up = roll_power_up(&mut rng, SMALL, 1.0).expect("chance 1.0 always spawns");
            assert!(power_up.position.is_within_bounds(SMALL));
            assert_eq!(power_up.duration, power_up.kind.duration());
            kinds.insert(power_up.kind);
        }

        assert_eq!(kinds.len(), PowerUpKind::ALL.len());
    }

    #[test]
    fn spawn_rate_tracks_chance() {
        let mut rng = StdRng::seed_from_u64(5);
        let spawned = (0..2000)
            .filter(|_| roll_power_up(&mut rng, SMALL, 0.2).is_some())
            .count();

        assert!((300..500).contains(&spawned), "spawned {spawned} of 2000");
    }
}
