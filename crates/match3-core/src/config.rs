//! Engine configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoringProfile {
    Balanced,
    Classic,
}

impl ScoringProfile {
    /// Base points for a match of `length`.
    pub fn base_points(self, length: usize) -> u64 {
        match self {
            ScoringProfile::Balanced => match length {
                3 => 50,
                4 => 150,
                5 => 400,
                6 => 800,
                n if n >= 7 => 200 * n as u64,
                _ => 0,
            },
            ScoringProfile::Classic => match length {
                3 => 100,
                4 => 400,
                5 => 1000,
                6 => 2000,
                n if n >= 7 => 500 * n as u64,
                _ => 0,
            },
        }
    }

    /// Multiplier applied to a resolution level's total, where `combo` is
    /// the count of resolution levels so far in the current cascade. The
    /// first level (`combo == 1`) is unmultiplied; only levels past the
    /// first get the combo bonus.
    pub fn combo_multiplier(self, combo: u32) -> f64 {
        if combo <= 1 {
            return 1.0;
        }
        let capped = combo.min(10) as f64;
        match self {
            ScoringProfile::Balanced => 1.0 + 0.05 * capped,
            ScoringProfile::Classic => 1.0 + 0.1 * capped,
        }
    }

    /// Per-level cascade depth bonus, added once per level (not multiplied
    /// by combo).
    pub fn depth_bonus(self, cascade_depth: u32) -> u64 {
        match self {
            ScoringProfile::Balanced => 25 * cascade_depth as u64,
            ScoringProfile::Classic => 50 * cascade_depth as u64,
        }
    }
}

/// Weights for the AI Analyzer's weighted total. Exposed so tests can
/// probe the ranking under non-default weightings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AiWeights {
    pub immediate: f64,
    pub cascade_potential: f64,
    pub board_delta: f64,
    pub risk_penalty: f64,
}

impl Default for AiWeights {
    fn default() -> Self {
        Self {
            immediate: 0.4,
            cascade_potential: 0.3,
            board_delta: 0.2,
            risk_penalty: 0.1,
        }
    }
}

/// Fixed penalty subtracted (after weighting) when a candidate move risks
/// an immediate deadlock.
pub const AI_RISK_PENALTY: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub board_size: usize,
    pub kinds_total: u8,
    pub scoring_profile: ScoringProfile,
    pub initial_kinds_allowed: u8,
    pub move_window: (u32, u32),
    pub cascade_depth_cap: u32,
    pub shuffle_attempts_cap: u32,
    pub hint_cooldown_ms: u32,
    pub hint_auto_delay_ms: u32,
    pub ai_weights: AiWeights,
    /// Whether a power-up created at the end of a cascade level activates
    /// automatically (`true`) or only on a later swap/click (`false`,
    /// the default).
    pub power_up_auto_activate: bool,
    /// Minimum legal-move count required at rest.
    pub min_legal_moves: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            board_size: 8,
            kinds_total: 7,
            scoring_profile: ScoringProfile::Balanced,
            initial_kinds_allowed: 7,
            move_window: (3, 15),
            cascade_depth_cap: 10,
            shuffle_attempts_cap: 10,
            hint_cooldown_ms: 5000,
            hint_auto_delay_ms: 30000,
            ai_weights: AiWeights::default(),
            power_up_auto_activate: false,
            min_legal_moves: 1,
        }
    }
}

impl Config {
    pub fn campaign() -> Self {
        Self {
            board_size: 9,
            ..Self::default()
        }
    }
}
