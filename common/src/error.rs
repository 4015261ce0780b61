use thiserror::Error;

use crate::PlayerId;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SnakeError {
    /// Fatal at session start: the board cannot host the requested game.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("no free interior cell left for the food of {player}")]
    FoodPlacementExhausted { player: PlayerId },
    /// Logic defect; only raised when debug assertions are enabled.
    #[error("coordinate ({row}, {col}) is outside the grid")]
    InvalidCoordinate { row: i32, col: i32 },
}

pub type SnakeResult<T> = Result<T, SnakeError>;
