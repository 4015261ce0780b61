use serde::{Deserialize, Serialize};

use crate::PlayerId;
use super::types::Coordinate;

const LEAST_SPEED_MS: u64 = 600;
const TOP_SPEED_MS: u64 = 30;

/// Terminal colour numbers assigned to players 1-4.
pub const PLAYER_COLORS: [u8; 4] = [209, 47, 227, 22];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Glyph {
    Food,
    Snake,
}

impl Glyph {
    pub fn as_char(&self) -> char {
        match self {
            Glyph::Food => '*',
            Glyph::Snake => '#',
        }
    }
}

pub const EMPTY_CHAR: char = ' ';

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorClass {
    Empty,
    Player(PlayerId),
}

impl ColorClass {
    pub fn terminal_color(&self) -> Option<u8> {
        match self {
            ColorClass::Empty => None,
            ColorClass::Player(id) => PLAYER_COLORS.get(id.index()).copied(),
        }
    }
}

/// One visual change for the rendering collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderDelta {
    Draw {
        cell: Coordinate,
        glyph: Glyph,
        color: ColorClass,
    },
    Clear {
        cell: Coordinate,
    },
}

impl RenderDelta {
    pub fn draw_food(cell: Coordinate, owner: PlayerId) -> Self {
        RenderDelta::Draw {
            cell,
            glyph: Glyph::Food,
            color: ColorClass::Player(owner),
        }
    }

    pub fn draw_snake(cell: Coordinate, owner: PlayerId) -> Self {
        RenderDelta::Draw {
            cell,
            glyph: Glyph::Snake,
            color: ColorClass::Player(owner),
        }
    }

    pub fn clear(cell: Coordinate) -> Self {
        RenderDelta::Clear { cell }
    }

    pub fn cell(&self) -> Coordinate {
        match self {
            RenderDelta::Draw { cell, .. } | RenderDelta::Clear { cell } => *cell,
        }
    }
}

/// A piece of status text anchored on the border frame.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusLabel {
    pub row: i32,
    pub col: i32,
    pub text: String,
    pub color: ColorClass,
}

/// Builds the status labels: a single score plus title when playing solo,
/// otherwise one label per player in the four corners.
pub fn status_labels(rows: i32, cols: i32, scores: &[(PlayerId, u32)]) -> Vec<StatusLabel> {
    if let [(_, score)] = scores {
        return vec![
            StatusLabel {
                row: 0,
                col: 2,
                text: format!("Score : {} ", score),
                color: ColorClass::Empty,
            },
            StatusLabel {
                row: 0,
                col: 27.min(cols - 7).max(0),
                text: " SNAKE ".to_string(),
                color: ColorClass::Empty,
            },
        ];
    }

    scores
        .iter()
        .map(|(id, score)| {
            let row = if id.index() / 2 == 0 { 0 } else { rows - 1 };
            let col = if id.index() % 2 == 0 { 2 } else { (3 * cols) / 5 };
            StatusLabel {
                row,
                col,
                text: format!(" Player {} Score : {} ", id.display_number(), score),
                color: ColorClass::Player(*id),
            }
        })
        .collect()
}

/// Milliseconds to wait between ticks; longer snakes play faster.
/// `base_speed` must keep `600 / base_speed` above 30.
pub fn tick_delay_ms(longest_len: usize, base_speed: u32) -> u64 {
    let initial = LEAST_SPEED_MS / u64::from(base_speed.max(1));
    let span = initial.saturating_sub(TOP_SPEED_MS).max(1);
    let len = longest_len as f64;
    let increase = (5.0 * (len / 5.0 + len / 10.0)) as u64;
    initial - increase % span
}
