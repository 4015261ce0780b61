use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::PlayerId;
use super::types::{Coordinate, DeathReason, Direction};

pub const INITIAL_SNAKE_LENGTH: usize = 3;

/// Head-first body plus heading. A live snake always has at least one cell;
/// a dead one has none.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snake {
    pub id: PlayerId,
    pub body: VecDeque<Coordinate>,
    pub direction: Direction,
    pub pending_direction: Option<Direction>,
    pub death_reason: Option<DeathReason>,
}

impl Snake {
    /// Builds a snake of `INITIAL_SNAKE_LENGTH` cells trailing behind `head`.
    /// Callers make sure every cell is interior.
    pub fn new(id: PlayerId, head: Coordinate, direction: Direction) -> Self {
        let behind = direction.opposite();
        let mut body = VecDeque::with_capacity(INITIAL_SNAKE_LENGTH);
        let mut cell = head;
        for _ in 0..INITIAL_SNAKE_LENGTH {
            body.push_back(cell);
            cell = cell.offset(behind);
        }

        Self::from_body(id, body, direction)
    }

    pub fn from_body(id: PlayerId, body: impl Into<VecDeque<Coordinate>>, direction: Direction) -> Self {
        Self {
            id,
            body: body.into(),
            direction,
            pending_direction: None,
            death_reason: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.death_reason.is_none()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn head(&self) -> Option<Coordinate> {
        self.body.front().copied()
    }

    pub fn tail(&self) -> Option<Coordinate> {
        self.body.back().copied()
    }

    pub fn occupies(&self, coord: &Coordinate) -> bool {
        self.body.contains(coord)
    }

    /// Stores an intent for the next tick; the latest intent wins. Reversal
    /// into the neck is accepted and left to self-collision.
    pub fn queue_direction(&mut self, direction: Direction) {
        if self.is_alive() {
            self.pending_direction = Some(direction);
        }
    }

    /// Commits the queued intent, if any, and returns the heading to move in.
    pub fn take_direction(&mut self) -> Direction {
        if let Some(direction) = self.pending_direction.take() {
            self.direction = direction;
        }
        self.direction
    }

    /// Raw next head (before any border rule).
    pub fn advance(&self, direction: Direction) -> Option<Coordinate> {
        self.head().map(|head| head.offset(direction))
    }

    /// Prepends `new_head`. Without food the tail is dropped and returned.
    pub fn grow_or_shrink(&mut self, new_head: Coordinate, ate_food: bool) -> Option<Coordinate> {
        self.body.push_front(new_head);
        if ate_food {
            None
        } else {
            self.body.pop_back()
        }
    }

    /// Marks the snake dead and hands back the cells it occupied.
    pub fn kill(&mut self, reason: DeathReason) -> Vec<Coordinate> {
        self.death_reason = Some(reason);
        self.pending_direction = None;
        self.body.drain(..).collect()
    }
}
