//! Match Detector: find all maximal runs of length >= 3.

use crate::board::{Board, Kind, Pos};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// A maximal run of >= 3 co-kind, untagged gems in a row or column.
///
/// Output order of `find_matches` is not part of the contract; compare runs
/// as a set keyed by `(orientation, min_cell, length)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub orientation: Orientation,
    pub kind: Kind,
    pub cells: Vec<Pos>,
}

impl Run {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn min_cell(&self) -> Pos {
        self.cells[0]
    }

    /// The cell index the Cascade Engine promotes a power-up at:
    /// `index = len / 2`, 0-based.
    pub fn center(&self) -> Pos {
        self.cells[self.len() / 2]
    }

    fn key(&self) -> (u8, Pos, usize) {
        let o = match self.orientation {
            Orientation::Horizontal => 0,
            Orientation::Vertical => 1,
        };
        (o, self.min_cell(), self.len())
    }
}

/// Finds every maximal horizontal and vertical run of length >= 3 among
/// same-kind, untagged gems. A run stops at the board edge, an `Empty`
/// cell, a differing `kind`, or a power-up-tagged gem: tagged gems never
/// participate in ordinary match detection.
pub fn find_matches(board: &Board) -> Vec<Run> {
    let mut runs = Vec::new();
    let n = board.n();

    for r in 0..n {
        let mut c = 0;
        while c < n {
            if let Some(kind) = untagged_kind_at(board, (r, c)) {
                let start = c;
                let mut end = c + 1;
                while end < n && untagged_kind_at(board, (r, end)) == Some(kind) {
                    end += 1;
                }
                if end - start >= 3 {
                    runs.push(Run {
                        orientation: Orientation::Horizontal,
                        kind,
                        cells: (start..end).map(|cc| (r, cc)).collect(),
                    });
                }
                c = end;
            } else {
                c += 1;
            }
        }
    }

    for c in 0..n {
        let mut r = 0;
        while r < n {
            if let Some(kind) = untagged_kind_at(board, (r, c)) {
                let start = r;
                let mut end = r + 1;
                while end < n && untagged_kind_at(board, (end, c)) == Some(kind) {
                    end += 1;
                }
                if end - start >= 3 {
                    runs.push(Run {
                        orientation: Orientation::Vertical,
                        kind,
                        cells: (start..end).map(|rr| (rr, c)).collect(),
                    });
                }
                r = end;
            } else {
                r += 1;
            }
        }
    }

    runs.sort_by_key(|run| run.key());
    runs
}

fn untagged_kind_at(board: &Board, pos: Pos) -> Option<Kind> {
    match board.get(pos).gem() {
        Some(g) if !g.is_tagged() => Some(g.kind),
        _ => None,
    }
}

/// True iff at least one match exists on the board.
pub fn has_any_match(board: &Board) -> bool {
    !find_matches(board).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;

    fn fill_row(board: &mut Board, row: usize, kinds: &[Kind]) {
        for (c, k) in kinds.iter().enumerate() {
            let gem = board.new_gem(*k);
            board.set((row, c), Cell::Occupied(gem));
        }
    }

    #[test]
    fn detects_horizontal_run_of_three() {
        use Kind::*;
        let mut b = Board::new(8);
        fill_row(&mut b, 0, &[A, A, A, B, C, D, E, F]);
        let runs = find_matches(&b);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].len(), 3);
        assert_eq!(runs[0].orientation, Orientation::Horizontal);
    }

    #[test]
    fn no_match_below_three() {
        use Kind::*;
        let mut b = Board::new(8);
        fill_row(&mut b, 0, &[A, A, B, C, D, E, F, G]);
        assert!(find_matches(&b).is_empty());
    }

    #[test]
    fn tagged_gems_never_match() {
        use Kind::*;
        let mut b = Board::new(8);
        fill_row(&mut b, 0, &[A, A, A, B, C, D, E, F]);
        let mut g = b.get((0, 1)).gem().copied().unwrap();
        g.power_up = Some(crate::board::PowerUpTag::LineH);
        b.set((0, 1), Cell::Occupied(g));
        assert!(find_matches(&b).is_empty());
    }

    #[test]
    fn idempotent_after_removal() {
        use Kind::*;
        let mut b = Board::new(8);
        fill_row(&mut b, 0, &[A, A, A, B, C, D, E, F]);
        for run in find_matches(&b) {
            for pos in run.cells {
                b.set(pos, Cell::Empty);
            }
        }
        assert!(find_matches(&b).is_empty());
    }
}
