//! The N x N board grid.
//!
//! Row 0 is the top; gravity pulls toward the highest row index.
//! `N` is a runtime parameter so the engine can serve both the canonical
//! 8x8 mode and the 9x9 Campaign variant from the same code path.

use super::cell::Cell;
use super::gem::{Gem, GemId, Kind};
use serde::{Deserialize, Serialize};

/// Position on the board as `(row, col)`.
pub type Pos = (usize, usize);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    n: usize,
    cells: Vec<Cell>,
    next_id: u64,
}

impl Board {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            cells: vec![Cell::Empty; n * n],
            next_id: 0,
        }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.0 < self.n && pos.1 < self.n
    }

    fn index(&self, pos: Pos) -> usize {
        pos.0 * self.n + pos.1
    }

    pub fn get(&self, pos: Pos) -> &Cell {
        &self.cells[self.index(pos)]
    }

    pub fn get_mut(&mut self, pos: Pos) -> &mut Cell {
        let i = self.index(pos);
        &mut self.cells[i]
    }

    pub fn set(&mut self, pos: Pos, cell: Cell) {
        let i = self.index(pos);
        self.cells[i] = cell;
    }

    /// Allocates a fresh, never-before-used gem id.
    pub fn fresh_id(&mut self) -> GemId {
        let id = GemId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Advances the id counter so the next `fresh_id()` is at least `next`.
    /// Used when rebuilding a board from a snapshot whose cell records carry
    /// their own ids, so freshly generated gems after a `load_snapshot`
    /// never collide with a restored one.
    pub fn fast_forward_ids(&mut self, next: u64) {
        self.next_id = self.next_id.max(next);
    }

    pub fn new_gem(&mut self, kind: Kind) -> Gem {
        Gem::new(self.fresh_id(), kind)
    }

    /// Swaps the contents of two cells without validating adjacency; the
    /// caller (Swap Engine) is responsible for the adjacency/legality check.
    pub fn swap_cells(&mut self, a: Pos, b: Pos) {
        let ia = self.index(a);
        let ib = self.index(b);
        self.cells.swap(ia, ib);
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        let n = self.n;
        (0..n).flat_map(move |r| (0..n).map(move |c| (r, c)))
    }

    pub fn column(&self, col: usize) -> impl Iterator<Item = &Cell> {
        (0..self.n).map(move |r| self.get((r, col)))
    }

    pub fn row(&self, row: usize) -> impl Iterator<Item = &Cell> {
        (0..self.n).map(move |c| self.get((row, c)))
    }

    /// True once every cell is occupied (the board is fully filled at rest).
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    /// True iff every occupied cell carries a distinct `GemId`.
    pub fn has_unique_ids(&self) -> bool {
        let mut seen = hashbrown::HashSet::new();
        self.cells
            .iter()
            .filter_map(|c| c.gem())
            .all(|g| seen.insert(g.id))
    }

    pub fn adjacent(a: Pos, b: Pos) -> bool {
        let dr = (a.0 as i64 - b.0 as i64).abs();
        let dc = (a.1 as i64 - b.1 as i64).abs();
        (dr + dc) == 1
    }

    /// 3x3 neighborhood around `center`, clipped to the board.
    pub fn neighborhood_3x3(&self, center: Pos) -> Vec<Pos> {
        let mut out = Vec::with_capacity(9);
        for dr in -1i64..=1 {
            for dc in -1i64..=1 {
                let r = center.0 as i64 + dr;
                let c = center.1 as i64 + dc;
                if r >= 0 && c >= 0 && (r as usize) < self.n && (c as usize) < self.n {
                    out.push((r as usize, c as usize));
                }
            }
        }
        out
    }
}
