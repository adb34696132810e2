//! Gravity & Refill.

use crate::board::{Board, Cell, Gem};
use crate::events::Event;
use crate::generator::Generator;
use match3_rng::EngineRng;

/// Compacts every column independently: occupied gems keep their relative
/// top-to-bottom order and restack at the bottom; vacated cells above become
/// `Empty`. Idempotent once the board is settled. Returns a `Fell` event for
/// every gem whose row actually changed.
pub fn apply_gravity(board: &mut Board) -> Vec<Event> {
    let n = board.n();
    let mut events = Vec::new();

    for col in 0..n {
        let occupied: Vec<(usize, Gem)> = (0..n)
            .filter_map(|row| board.get((row, col)).gem().map(|g| (row, *g)))
            .collect();

        for row in 0..n {
            board.set((row, col), Cell::Empty);
        }

        let empty_rows = n - occupied.len();
        for (i, (from_row, gem)) in occupied.into_iter().enumerate() {
            let to_row = empty_rows + i;
            board.set((to_row, col), Cell::Occupied(gem));
            if from_row != to_row {
                events.push(Event::Fell {
                    from: (from_row, col),
                    to: (to_row, col),
                    gem: gem.id,
                });
            }
        }
    }

    events
}

/// Refills every `Empty` cell via the Generator. Proceeds top-to-bottom,
/// column by column, so the only observable constraint is the placement
/// rule's "avoid immediate match at placement" behavior.
pub fn refill(board: &mut Board, gen: &Generator, rng: &mut EngineRng) -> Vec<Event> {
    let n = board.n();
    let mut events = Vec::new();

    for col in 0..n {
        for row in 0..n {
            if board.get((row, col)).is_empty() {
                let kind = gen.generate_kind(board, (row, col), rng);
                let gem = board.new_gem(kind);
                let id = gem.id;
                board.set((row, col), Cell::Occupied(gem));
                events.push(Event::Spawned {
                    cell: (row, col),
                    gem: id,
                    kind,
                });
            }
        }
    }

    events
}
