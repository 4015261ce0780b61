use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable player identity; doubles as the index into per-player state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(usize);

impl PlayerId {
    pub fn new(id: usize) -> Self {
        Self(id)
    }

    pub fn index(&self) -> usize {
        self.0
    }

    /// One-based number shown to humans.
    pub fn display_number(&self) -> usize {
        self.0 + 1
    }
}

impl From<usize> for PlayerId {
    fn from(id: usize) -> Self {
        Self(id)
    }
}

impl From<PlayerId> for usize {
    fn from(id: PlayerId) -> Self {
        id.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.display_number())
    }
}
