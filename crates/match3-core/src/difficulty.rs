//! Difficulty Controller.

use crate::board::{Board, Cell, Pos};
use crate::deadlock::legal_moves;
use crate::generator::Generator;
use match3_rng::EngineRng;
use serde::{Deserialize, Serialize};

/// Per-tier settings derived from the level number. `tier = floor((level -
/// 1) / 10)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultySettings {
    pub tier: u32,
    pub kinds_allowed: u8,
    pub min_moves_target: u32,
    pub max_moves_target: u32,
    pub cascade_pressure_max: u32,
    pub gen_attempts: u32,
}

impl DifficultySettings {
    pub fn for_level(level: u32) -> Self {
        let tier = (level.saturating_sub(1)) / 10;
        let kinds_allowed = (7u32.saturating_sub(tier / 3)).max(4).min(7) as u8;
        let min_moves_target = 8u32.saturating_sub(tier).max(3);
        let max_moves_target = (15u32.saturating_sub(tier).max(6)).max(min_moves_target);
        let cascade_pressure_max = (5u32.saturating_sub(tier / 2)).max(2);
        let gen_attempts = 100 + 20 * tier;

        Self {
            tier,
            kinds_allowed,
            min_moves_target,
            max_moves_target,
            cascade_pressure_max,
            gen_attempts,
        }
    }
}

/// Count of adjacent same-kind, untagged pairs ("near-matches"), the
/// cascade-pressure metric used by board shaping.
pub fn adjacent_pair_count(board: &Board) -> u32 {
    let n = board.n();
    let mut count = 0;
    for r in 0..n {
        for c in 0..n {
            if c + 1 < n && same_untagged_kind(board, (r, c), (r, c + 1)) {
                count += 1;
            }
            if r + 1 < n && same_untagged_kind(board, (r, c), (r + 1, c)) {
                count += 1;
            }
        }
    }
    count
}

fn same_untagged_kind(board: &Board, a: Pos, b: Pos) -> bool {
    match (board.get(a).gem(), board.get(b).gem()) {
        (Some(ga), Some(gb)) => !ga.is_tagged() && !gb.is_tagged() && ga.kind == gb.kind,
        _ => false,
    }
}

/// Shapes a freshly-filled board toward the move-count window and the
/// cascade-pressure ceiling by locally perturbing cells, up to
/// `settings.gen_attempts` tries; then accepts the board regardless.
pub fn shape_board(
    board: &mut Board,
    gen: &Generator,
    rng: &mut EngineRng,
    settings: &DifficultySettings,
) {
    for _ in 0..settings.gen_attempts {
        let moves = legal_moves(board).len() as u32;
        let pressure = adjacent_pair_count(board);

        let in_window = moves >= settings.min_moves_target
            && moves <= settings.max_moves_target
            && pressure <= settings.cascade_pressure_max;
        if in_window {
            return;
        }

        let pos = (rng.index(board.n()), rng.index(board.n()));
        let candidate = gen.generate_kind(board, pos, rng);
        let has_gem = board.get(pos).gem().is_some();
        if has_gem {
            let gem = board.new_gem(candidate);
            board.set(pos, Cell::Occupied(gem));
        }
    }
}

/// Rolling per-player metrics feeding the optional adaptive difficulty
/// variant. Pure: same window in, same settings out, no hidden state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerMetrics {
    pub move_efficiency: f64,
    pub cascade_frequency: f64,
    pub avg_move_score: f64,
    pub consecutive_failures: u32,
}

/// Adjusts `base` within its documented ranges using the rolling metric
/// window. Struggling players (many consecutive failures, low move
/// efficiency) get more kinds narrowed out and an easier move-count floor;
/// thriving players get the opposite, still clamped to the tier's range.
pub fn adapt_settings(base: DifficultySettings, metrics: &PlayerMetrics) -> DifficultySettings {
    let mut settings = base;

    if metrics.consecutive_failures >= 3 || metrics.move_efficiency < 0.3 {
        settings.kinds_allowed = settings.kinds_allowed.saturating_sub(1).max(4);
        settings.min_moves_target = (settings.min_moves_target + 1).min(settings.max_moves_target);
    } else if metrics.move_efficiency > 0.8 && metrics.consecutive_failures == 0 {
        settings.kinds_allowed = (settings.kinds_allowed + 1).min(7);
        settings.min_moves_target = settings.min_moves_target.saturating_sub(1).max(3);
    }

    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_zero_matches_defaults() {
        let s = DifficultySettings::for_level(1);
        assert_eq!(s.tier, 0);
        assert_eq!(s.kinds_allowed, 7);
        assert_eq!(s.min_moves_target, 8);
        assert_eq!(s.max_moves_target, 15);
        assert_eq!(s.cascade_pressure_max, 5);
        assert_eq!(s.gen_attempts, 100);
    }

    #[test]
    fn higher_tiers_narrow_kinds_and_window() {
        let s = DifficultySettings::for_level(31); // tier = 3
        assert_eq!(s.tier, 3);
        assert_eq!(s.kinds_allowed, 6);
        assert_eq!(s.min_moves_target, 5);
        assert!(s.max_moves_target >= s.min_moves_target);
    }

    #[test]
    fn adapt_tightens_after_failures() {
        let base = DifficultySettings::for_level(1);
        let metrics = PlayerMetrics {
            consecutive_failures: 4,
            move_efficiency: 0.1,
            ..Default::default()
        };
        let adapted = adapt_settings(base, &metrics);
        assert!(adapted.kinds_allowed <= base.kinds_allowed);
        assert!(adapted.min_moves_target >= base.min_moves_target);
    }
}
