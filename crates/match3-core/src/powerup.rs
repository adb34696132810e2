//! Power-Up System: creation tags and activation impact sets.

use crate::board::{Board, Kind, Pos, PowerUpTag};
use hashbrown::HashSet;

/// Which tag a match of a given length (on a given axis) promotes to.
/// Returns `None` for matches under 4 (those simply score and clear).
pub fn tag_for_match(length: usize, orientation: crate::match_detect::Orientation) -> Option<PowerUpTag> {
    use crate::match_detect::Orientation::*;
    match length {
        0..=3 => None,
        4 => Some(match orientation {
            Horizontal => PowerUpTag::LineH,
            Vertical => PowerUpTag::LineV,
        }),
        5 => Some(PowerUpTag::ColorClear),
        _ => Some(PowerUpTag::Bomb3x3),
    }
}

/// Deterministic impact set for activating `tag` anchored at `anchor`.
/// The anchor itself is always included. `color_target` supplies the
/// `Kind` a `ColorClear` activation should remove; callers choose it (the
/// swap target's kind, or the board's most common non-power-up kind for a
/// direct click).
pub fn impact_set(
    board: &Board,
    tag: PowerUpTag,
    anchor: Pos,
    color_target: Option<Kind>,
) -> HashSet<Pos> {
    let mut out = HashSet::new();
    out.insert(anchor);

    match tag {
        PowerUpTag::LineH => {
            for c in 0..board.n() {
                out.insert((anchor.0, c));
            }
        }
        PowerUpTag::LineV => {
            for r in 0..board.n() {
                out.insert((r, anchor.1));
            }
        }
        PowerUpTag::Bomb3x3 => {
            for pos in board.neighborhood_3x3(anchor) {
                out.insert(pos);
            }
        }
        PowerUpTag::ColorClear => {
            if let Some(target) = color_target {
                for pos in board.positions() {
                    if let Some(g) = board.get(pos).gem() {
                        if !g.is_tagged() && g.kind == target {
                            out.insert(pos);
                        }
                    }
                }
            }
        }
    }

    out
}

/// Picks the most common non-power-up kind on the board, for a
/// direct-click `ColorClear` activation.
pub fn most_common_kind(board: &Board) -> Option<Kind> {
    let mut counts: hashbrown::HashMap<Kind, usize> = hashbrown::HashMap::new();
    for pos in board.positions() {
        if let Some(g) = board.get(pos).gem() {
            if !g.is_tagged() {
                *counts.entry(g.kind).or_insert(0) += 1;
            }
        }
    }
    counts.into_iter().max_by_key(|(_, n)| *n).map(|(k, _)| k)
}

/// Flat per-affected-cell score bonus for an activation.
pub fn activation_bonus(tag: PowerUpTag, impacted_cells: usize) -> u64 {
    let per_cell = match tag {
        PowerUpTag::LineH | PowerUpTag::LineV => 75,
        PowerUpTag::Bomb3x3 => 100,
        PowerUpTag::ColorClear => 125,
    };
    per_cell * impacted_cells as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;

    #[test]
    fn bomb_impact_is_clipped_at_corner() {
        let board = Board::new(8);
        let impact = impact_set(&board, PowerUpTag::Bomb3x3, (0, 0), None);
        // Corner: only the 2x2 quadrant is in-bounds.
        assert_eq!(impact.len(), 4);
    }

    #[test]
    fn bomb_impact_is_3x3_in_interior() {
        let board = Board::new(8);
        let impact = impact_set(&board, PowerUpTag::Bomb3x3, (4, 4), None);
        assert_eq!(impact.len(), 9);
    }

    #[test]
    fn line_h_covers_full_row() {
        let board = Board::new(8);
        let impact = impact_set(&board, PowerUpTag::LineH, (3, 3), None);
        assert_eq!(impact.len(), 8);
        assert!(impact.iter().all(|p| p.0 == 3));
    }

    #[test]
    fn color_clear_targets_only_matching_untagged_kind() {
        let mut board = Board::new(4);
        for pos in [(0, 0), (1, 1)] {
            let gem = board.new_gem(Kind::C);
            board.set(pos, Cell::Occupied(gem));
        }
        let other = board.new_gem(Kind::B);
        board.set((2, 2), Cell::Occupied(other));
        let impact = impact_set(&board, PowerUpTag::ColorClear, (0, 0), Some(Kind::C));
        assert_eq!(impact.len(), 2);
    }

    #[test]
    fn match4_promotes_axis_aligned_line_tag() {
        use crate::match_detect::Orientation::*;
        assert_eq!(tag_for_match(4, Horizontal), Some(PowerUpTag::LineH));
        assert_eq!(tag_for_match(4, Vertical), Some(PowerUpTag::LineV));
        assert_eq!(tag_for_match(5, Horizontal), Some(PowerUpTag::ColorClear));
        assert_eq!(tag_for_match(6, Vertical), Some(PowerUpTag::Bomb3x3));
        assert_eq!(tag_for_match(3, Horizontal), None);
    }
}
