//! Persisted state layout: `BoardState`, the blob the caller-supplied
//! Store round-trips byte-for-byte.

use crate::board::{Board, Cell, Gem, GemId, Kind, PowerUpTag};
use crate::config::Config;
use crate::difficulty::DifficultySettings;
use crate::error::LoadError;
use crate::hint::HintSession;
use match3_rng::EngineRng;
use serde::{Deserialize, Serialize};

/// Current snapshot schema version. Bumped whenever the on-disk shape of
/// `BoardState` changes in a way old blobs can't be read as.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellRecord {
    pub row: usize,
    pub col: usize,
    pub kind: Kind,
    pub tag: Option<PowerUpTag>,
    pub id: GemId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardState {
    pub version: u32,
    pub n: usize,
    pub cells: Vec<CellRecord>,
    pub score: u64,
    pub level: u32,
    pub mode: GameMode,
    pub rng: EngineRng,
    pub difficulty_settings: DifficultySettings,
    pub hint_session: HintSession,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    Campaign,
    TimeAttack,
    DailyChallenge,
    Endless,
}

/// Serializes a live board into the persisted cell-record layout.
pub fn board_to_state(board: &Board) -> Vec<CellRecord> {
    board
        .positions()
        .filter_map(|pos| {
            board.get(pos).gem().map(|g| CellRecord {
                row: pos.0,
                col: pos.1,
                kind: g.kind,
                tag: g.power_up,
                id: g.id,
            })
        })
        .collect()
}

/// Rebuilds a `Board` of size `n` from persisted cell records, validating
/// size and structural consistency as it goes.
pub fn board_from_state(n: usize, cells: &[CellRecord]) -> Result<Board, LoadError> {
    let mut board = Board::new(n);
    let mut max_id = 0u64;
    for rec in cells {
        if rec.row >= n || rec.col >= n {
            return Err(LoadError::SizeMismatch);
        }
        let gem = match rec.tag {
            Some(tag) => Gem::with_power_up(rec.id, rec.kind, tag),
            None => Gem::new(rec.id, rec.kind),
        };
        max_id = max_id.max(rec.id.0);
        board.set((rec.row, rec.col), Cell::Occupied(gem));
    }
    board.fast_forward_ids(max_id + 1);
    if !board.has_unique_ids() {
        return Err(LoadError::CorruptSnapshot);
    }
    Ok(board)
}

impl Config {
    pub fn validate_against(&self, state: &BoardState) -> Result<(), LoadError> {
        if state.version != SNAPSHOT_VERSION {
            return Err(LoadError::VersionMismatch);
        }
        if state.n != self.board_size {
            return Err(LoadError::SizeMismatch);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::Generator;

    #[test]
    fn round_trips_through_state_records() {
        let gen = Generator::new(Kind::prefix(7));
        let mut rng = EngineRng::new(42);
        let mut board = Board::new(8);
        gen.fill_initial(&mut board, &mut rng);

        let records = board_to_state(&board);
        let restored = board_from_state(8, &records).unwrap();

        assert_eq!(board.occupied_count(), restored.occupied_count());
        for pos in board.positions() {
            assert_eq!(
                board.get(pos).gem().map(|g| g.kind),
                restored.get(pos).gem().map(|g| g.kind)
            );
        }
    }

    #[test]
    fn rejects_out_of_bounds_cell_records() {
        let cells = vec![CellRecord {
            row: 10,
            col: 10,
            kind: Kind::A,
            tag: None,
            id: GemId(0),
        }];
        assert_eq!(
            board_from_state(8, &cells).unwrap_err(),
            LoadError::SizeMismatch
        );
    }
}
