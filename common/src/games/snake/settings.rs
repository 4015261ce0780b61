use serde::{Deserialize, Serialize};

use crate::config::Validate;
use crate::error::SnakeError;
use super::grid::{Grid, MIN_COLS, MIN_ROWS};
use super::render::PLAYER_COLORS;
use super::snake::INITIAL_SNAKE_LENGTH;
use super::types::BoundaryMode;

pub const MAX_GRID_SIZE: usize = 200;
pub const MAX_PLAYERS: usize = PLAYER_COLORS.len();
/// Highest speed divisor that keeps the initial delay above the 30 ms floor.
pub const MAX_BASE_SPEED: u32 = 19;

/// Everything a session needs to know before the first tick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub grid_rows: usize,
    pub grid_cols: usize,
    pub boundary_mode: BoundaryMode,
    pub player_count: usize,
    pub base_speed: u32,
    pub kill_bonus: u32,
    pub max_food_score: u32,
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            grid_rows: 40,
            grid_cols: 100,
            boundary_mode: BoundaryMode::Wrap,
            player_count: 1,
            base_speed: 5,
            kill_bonus: 50,
            max_food_score: 100,
            seed: None,
        }
    }
}

impl Validate for SimulationConfig {
    fn validate(&self) -> Result<(), String> {
        if !(MIN_ROWS..=MAX_GRID_SIZE).contains(&self.grid_rows) {
            return Err(format!("Grid rows must be between {} and {}", MIN_ROWS, MAX_GRID_SIZE));
        }
        if !(MIN_COLS..=MAX_GRID_SIZE).contains(&self.grid_cols) {
            return Err(format!("Grid columns must be between {} and {}", MIN_COLS, MAX_GRID_SIZE));
        }
        if !(1..=MAX_PLAYERS).contains(&self.player_count) {
            return Err(format!("Snake supports 1-{} players", MAX_PLAYERS));
        }
        if !(1..=MAX_BASE_SPEED).contains(&self.base_speed) {
            return Err(format!("Base speed must be between 1 and {}", MAX_BASE_SPEED));
        }
        if self.max_food_score < 1 {
            return Err("Max food score must be at least 1".to_string());
        }

        let interior = (self.grid_rows - 2) * (self.grid_cols - 2);
        let needed = self.player_count * (INITIAL_SNAKE_LENGTH + 1);
        if interior < needed {
            return Err(format!(
                "Grid interior has {} cells but {} players need {}",
                interior, self.player_count, needed
            ));
        }
        Ok(())
    }
}

/// The subset of the configuration the engine consults every tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rules {
    pub grid: Grid,
    pub boundary_mode: BoundaryMode,
    pub kill_bonus: u32,
    pub max_food_score: u32,
}

impl TryFrom<&SimulationConfig> for Rules {
    type Error = SnakeError;

    fn try_from(config: &SimulationConfig) -> Result<Self, Self::Error> {
        config.validate().map_err(SnakeError::InvalidConfiguration)?;

        Ok(Self {
            grid: Grid::new(config.grid_rows, config.grid_cols)?,
            boundary_mode: config.boundary_mode,
            kill_bonus: config.kill_bonus,
            max_food_score: config.max_food_score,
        })
    }
}
