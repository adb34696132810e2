//! Swap Engine: adjacency check, legality test, commit/rollback.

use crate::board::{Board, Pos};
use crate::error::SwapError;
use crate::match_detect::has_any_match;

/// What the Cascade Engine should do after a swap has been committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapTrigger {
    /// Ordinary match resolution: run the Cascade Engine from `DETECT`.
    Match,
    /// One or both swapped cells now hold a power-up tag; activate it/them
    /// before falling through to cascade resolution.
    PowerUpActivation { tagged: Vec<Pos> },
}

/// Attempts to swap the gems at `a` and `b`.
///
/// 1. Rejects non-adjacent cells or out-of-bounds cells without mutating
///    the board.
/// 2. Tentatively swaps. If either destination cell now holds a
///    power-up-tagged gem, the swap commits unconditionally and the caller
///    is told to run power-up activation.
/// 3. Otherwise runs the Match Detector; no match rolls the swap back.
/// 4. A match commits the swap and tells the caller to run the Cascade
///    Engine.
pub fn attempt_swap(board: &mut Board, a: Pos, b: Pos) -> Result<SwapTrigger, SwapError> {
    if !board.in_bounds(a) || !board.in_bounds(b) {
        return Err(SwapError::OutOfBounds);
    }
    if !Board::adjacent(a, b) {
        return Err(SwapError::NotAdjacent);
    }

    board.swap_cells(a, b);

    let mut tagged = Vec::new();
    for pos in [a, b] {
        if let Some(g) = board.get(pos).gem() {
            if g.is_tagged() {
                tagged.push(pos);
            }
        }
    }
    if !tagged.is_empty() {
        return Ok(SwapTrigger::PowerUpActivation { tagged });
    }

    if has_any_match(board) {
        Ok(SwapTrigger::Match)
    } else {
        // Roll back: swapping the same pair again is its own inverse.
        board.swap_cells(a, b);
        Err(SwapError::NoMatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Cell, Kind};

    fn board_with_pending_match() -> Board {
        use Kind::*;
        let mut b = Board::new(8);
        // Row 0: A A B A -> swapping (0,2)<->(0,3) yields A A A B.
        for (c, k) in [A, A, B, A].into_iter().enumerate() {
            let gem = b.new_gem(k);
            b.set((0, c), Cell::Occupied(gem));
        }
        for c in 4..8 {
            let gem = b.new_gem(Kind::from_ordinal((c % 4) as u8 + 2).unwrap_or(C));
            b.set((0, c), Cell::Occupied(gem));
        }
        b
    }

    #[test]
    fn non_adjacent_is_rejected_without_mutation() {
        let mut b = board_with_pending_match();
        let before = format!("{:?}", b);
        let err = attempt_swap(&mut b, (0, 0), (0, 2)).unwrap_err();
        assert_eq!(err, SwapError::NotAdjacent);
        assert_eq!(before, format!("{:?}", b));
    }

    #[test]
    fn adjacent_swap_with_no_match_rolls_back() {
        let mut b = board_with_pending_match();
        // (0,0)<->(1,0): row1 is empty cells, so no match; must roll back.
        let before = format!("{:?}", b);
        let err = attempt_swap(&mut b, (0, 0), (1, 0)).unwrap_err();
        assert_eq!(err, SwapError::NoMatch);
        assert_eq!(before, format!("{:?}", b));
    }

    #[test]
    fn adjacent_swap_producing_match_commits() {
        let mut b = board_with_pending_match();
        let outcome = attempt_swap(&mut b, (0, 2), (0, 3)).unwrap();
        assert_eq!(outcome, SwapTrigger::Match);
    }

    #[test]
    fn swap_onto_power_up_triggers_activation() {
        use Kind::*;
        let mut b = Board::new(8);
        let mut tagged = b.new_gem(A);
        tagged.power_up = Some(crate::board::PowerUpTag::LineH);
        b.set((0, 0), Cell::Occupied(tagged));
        let plain = b.new_gem(B);
        b.set((0, 1), Cell::Occupied(plain));
        let outcome = attempt_swap(&mut b, (0, 0), (0, 1)).unwrap();
        match outcome {
            SwapTrigger::PowerUpActivation { tagged } => assert_eq!(tagged.len(), 1),
            _ => panic!("expected PowerUpActivation"),
        }
    }
}
