//! Board cell: either empty (transient, only during cascade) or occupied.

use super::gem::Gem;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Occupied(Gem),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn gem(&self) -> Option<&Gem> {
        match self {
            Cell::Occupied(g) => Some(g),
            Cell::Empty => None,
        }
    }

    pub fn gem_mut(&mut self) -> Option<&mut Gem> {
        match self {
            Cell::Occupied(g) => Some(g),
            Cell::Empty => None,
        }
    }

    pub fn take(&mut self) -> Cell {
        core::mem::replace(self, Cell::Empty)
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::Empty
    }
}
