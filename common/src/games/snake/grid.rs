use serde::{Deserialize, Serialize};

use crate::error::{SnakeError, SnakeResult};
use super::types::{BoundaryMode, Coordinate};

/// Smallest board that still has a 3x4 interior.
pub const MIN_ROWS: usize = 5;
pub const MIN_COLS: usize = 6;

/// Fixed-size board. Row/column 0 and the last row/column form the border
/// frame; everything else is interior.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: i32,
    cols: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WrapResult {
    pub coord: Coordinate,
    pub died: bool,
}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> SnakeResult<Self> {
        if rows < MIN_ROWS || cols < MIN_COLS {
            return Err(SnakeError::InvalidConfiguration(format!(
                "grid {}x{} is smaller than the minimum {}x{}",
                rows, cols, MIN_ROWS, MIN_COLS
            )));
        }
        let rows = i32::try_from(rows).map_err(|_| {
            SnakeError::InvalidConfiguration(format!("grid row count {} is too large", rows))
        })?;
        let cols = i32::try_from(cols).map_err(|_| {
            SnakeError::InvalidConfiguration(format!("grid column count {} is too large", cols))
        })?;
        Ok(Self { rows, cols })
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn interior_cell_count(&self) -> usize {
        ((self.rows - 2) * (self.cols - 2)) as usize
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        (0..self.rows).contains(&coord.row) && (0..self.cols).contains(&coord.col)
    }

    pub fn is_border(&self, coord: Coordinate) -> bool {
        coord.row == 0
            || coord.col == 0
            || coord.row == self.rows - 1
            || coord.col == self.cols - 1
    }

    pub fn is_interior(&self, coord: Coordinate) -> bool {
        (1..=self.rows - 2).contains(&coord.row) && (1..=self.cols - 2).contains(&coord.col)
    }

    /// Defensive range check for coordinates entering the engine.
    pub fn check(&self, coord: Coordinate) -> SnakeResult<Coordinate> {
        if self.contains(coord) {
            Ok(coord)
        } else {
            Err(SnakeError::InvalidCoordinate {
                row: coord.row,
                col: coord.col,
            })
        }
    }

    /// Applies the border rule to a freshly advanced head. In `Wrap` mode a
    /// head on the border moves to the opposite interior edge; in `Death`
    /// mode it stays put and is flagged dead.
    pub fn wrap_or_die(&self, coord: Coordinate, mode: BoundaryMode) -> WrapResult {
        if !self.is_border(coord) {
            return WrapResult { coord, died: false };
        }

        match mode {
            BoundaryMode::Death => WrapResult { coord, died: true },
            BoundaryMode::Wrap => {
                let mut wrapped = coord;
                if wrapped.row == 0 {
                    wrapped.row = self.rows - 2;
                } else if wrapped.row == self.rows - 1 {
                    wrapped.row = 1;
                }
                if wrapped.col == 0 {
                    wrapped.col = self.cols - 2;
                } else if wrapped.col == self.cols - 1 {
                    wrapped.col = 1;
                }
                WrapResult {
                    coord: wrapped,
                    died: false,
                }
            }
        }
    }

    pub fn interior_cells(&self) -> impl Iterator<Item = Coordinate> + '_ {
        (1..=self.rows - 2).flat_map(move |row| (1..=self.cols - 2).map(move |col| Coordinate::new(row, col)))
    }
}
