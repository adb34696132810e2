//! Hint Session: a 5-level progressive disclosure state machine.

use crate::ai::{DifficultyTag, MoveAnalysis};
use crate::board::Pos;
use crate::error::HintError;
use serde::{Deserialize, Serialize};

/// Budget of allowed uses at each hint level.
const LEVEL_BUDGETS: [u32; 5] = [10, 8, 6, 4, 2];

/// What a `request_hint` call reveals, scaled to the current level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HintResult {
    /// Level 1: the quadrant containing the best move's source cell.
    Quadrant { quadrant: (u8, u8) },
    /// Level 2: the row or column of the best move (whichever axis the
    /// move's `from`/`to` differ on).
    RowOrCol { row: Option<usize>, col: Option<usize> },
    /// Level 3: the source cell of the best move.
    Source { from: Pos },
    /// Level 4: source cell plus predicted points.
    SourceAndPoints { from: Pos, predicted_points: u64 },
    /// Level 5: full disclosure.
    Full {
        from: Pos,
        to: Pos,
        predicted_points: u64,
        difficulty_tag: DifficultyTag,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HintSession {
    level: u8,
    budget_remaining: u32,
    cooldown_ms: u32,
    /// Milliseconds since session start that the next hint is allowed at.
    next_allowed_ms: u64,
    /// Board size, for the level-1 quadrant split. Defaults to 8 (the
    /// canonical mode) when constructed with [`HintSession::new`].
    board_n: usize,
}

impl HintSession {
    pub fn new(cooldown_ms: u32) -> Self {
        Self::with_board_size(cooldown_ms, 8)
    }

    pub fn with_board_size(cooldown_ms: u32, board_n: usize) -> Self {
        Self {
            level: 1,
            budget_remaining: LEVEL_BUDGETS[0],
            cooldown_ms,
            next_allowed_ms: 0,
            board_n: board_n.max(1),
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn budget_remaining(&self) -> u32 {
        self.budget_remaining
    }

    /// Consumes one budget unit at the current level and returns the
    /// `HintResult` derived from the top-ranked `MoveAnalysis`. Transitions
    /// to the next level (resetting its budget) once this level's budget
    /// reaches zero; level 5 never transitions further.
    pub fn request_hint(
        &mut self,
        now_ms: u64,
        ranked: &[MoveAnalysis],
    ) -> Result<HintResult, HintError> {
        if now_ms < self.next_allowed_ms {
            return Err(HintError::CooldownActive {
                remaining_ms: (self.next_allowed_ms - now_ms) as u32,
            });
        }
        let best = ranked.first().ok_or(HintError::NoLegalMoves)?;
        if self.budget_remaining == 0 {
            return Err(HintError::BudgetExhausted);
        }

        let result = self.reveal(best);

        self.budget_remaining -= 1;
        self.next_allowed_ms = now_ms + self.cooldown_ms as u64;
        if self.budget_remaining == 0 && (self.level as usize) < LEVEL_BUDGETS.len() {
            self.level += 1;
            self.budget_remaining = LEVEL_BUDGETS[(self.level - 1) as usize];
        }

        Ok(result)
    }

    fn reveal(&self, best: &MoveAnalysis) -> HintResult {
        match self.level {
            1 => HintResult::Quadrant {
                quadrant: quadrant_of(best.from, self.board_n),
            },
            2 => HintResult::RowOrCol {
                row: (best.from.0 == best.to.0).then_some(best.from.0),
                col: (best.from.1 == best.to.1).then_some(best.from.1),
            },
            3 => HintResult::Source { from: best.from },
            4 => HintResult::SourceAndPoints {
                from: best.from,
                predicted_points: best.immediate_points,
            },
            _ => HintResult::Full {
                from: best.from,
                to: best.to,
                predicted_points: best.immediate_points,
                difficulty_tag: best.difficulty_tag,
            },
        }
    }
}

fn quadrant_of(pos: Pos, board_n: usize) -> (u8, u8) {
    // Coarse 2x2 quadrant split over the actual board size; the contract
    // only promises "general board region containing the best move".
    let half = (board_n / 2).max(1);
    let r = if pos.0 < half { 0 } else { 1 };
    let c = if pos.1 < half { 0 } else { 1 };
    (r, c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::DifficultyTag;

    fn sample_moves() -> Vec<MoveAnalysis> {
        vec![MoveAnalysis {
            from: (1, 1),
            to: (1, 2),
            immediate_points: 150,
            cascade_potential: 0.0,
            board_delta: 0,
            risk: 0,
            expected_score: 60.0,
            difficulty_tag: DifficultyTag::Medium,
        }]
    }

    #[test]
    fn exhausting_level1_budget_transitions_to_level2() {
        let mut session = HintSession::new(0);
        let moves = sample_moves();
        for i in 0..10 {
            session.request_hint(i, &moves).unwrap();
        }
        assert_eq!(session.level(), 2);
        assert_eq!(session.budget_remaining(), 8);
    }

    #[test]
    fn level_five_never_transitions() {
        let mut session = HintSession::new(0);
        session.level = 5;
        session.budget_remaining = 2;
        let moves = sample_moves();
        session.request_hint(0, &moves).unwrap();
        session.request_hint(1, &moves).unwrap();
        assert_eq!(session.level(), 5);
        assert_eq!(session.budget_remaining(), 0);
        assert_eq!(
            session.request_hint(2, &moves),
            Err(HintError::BudgetExhausted)
        );
    }

    #[test]
    fn cooldown_blocks_rapid_requests() {
        let mut session = HintSession::new(5000);
        let moves = sample_moves();
        session.request_hint(0, &moves).unwrap();
        let err = session.request_hint(100, &moves).unwrap_err();
        assert!(matches!(err, HintError::CooldownActive { .. }));
    }

    #[test]
    fn no_legal_moves_is_reported() {
        let mut session = HintSession::new(0);
        assert_eq!(
            session.request_hint(0, &[]),
            Err(HintError::NoLegalMoves)
        );
    }
}
