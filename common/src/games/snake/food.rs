use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{SnakeError, SnakeResult};
use crate::games::SessionRng;
use crate::PlayerId;
use super::grid::Grid;
use super::types::Coordinate;

const MAX_SAMPLING_ATTEMPTS: usize = 256;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Food {
    pub position: Coordinate,
    pub spawned_at: Duration,
}

impl Food {
    pub fn new(position: Coordinate, spawned_at: Duration) -> Self {
        Self {
            position,
            spawned_at,
        }
    }
}

/// Picks a uniformly random interior cell outside `occupied`.
///
/// Rejection sampling is tried first. When the board is crowded enough that
/// sampling keeps missing, the free cells are enumerated and one is drawn
/// directly, which keeps the distribution uniform and always terminates.
pub fn place_food(
    grid: &Grid,
    occupied: &HashSet<Coordinate>,
    rng: &mut SessionRng,
    player: PlayerId,
) -> SnakeResult<Coordinate> {
    let blocked = occupied.iter().filter(|c| grid.is_interior(**c)).count();
    if blocked >= grid.interior_cell_count() {
        return Err(SnakeError::FoodPlacementExhausted { player });
    }

    for _ in 0..MAX_SAMPLING_ATTEMPTS {
        let candidate = Coordinate::new(
            rng.random_range(1..=grid.rows() - 2),
            rng.random_range(1..=grid.cols() - 2),
        );
        if !occupied.contains(&candidate) {
            return Ok(candidate);
        }
    }

    let free: Vec<Coordinate> = grid
        .interior_cells()
        .filter(|c| !occupied.contains(c))
        .collect();
    rng.choose(&free)
        .copied()
        .ok_or(SnakeError::FoodPlacementExhausted { player })
}

/// `floor(max_score / (elapsed_seconds + 1))`.
pub fn food_score(max_score: u32, elapsed: Duration) -> u32 {
    let divisor = elapsed.as_secs_f64() + 1.0;
    (f64::from(max_score) / divisor).floor() as u32
}
