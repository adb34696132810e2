//! The ordered event log emitted by every cascade resolution.
//!
//! This is the sole contract with the outer shell's renderer. Events within
//! one engine call are totally ordered; reordering within a cascade level is
//! permitted as long as the final board state is identical.

use crate::board::{GemId, Kind, Pos};
use crate::match_detect::Orientation;
use crate::board::PowerUpTag;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    Matched {
        cells: Vec<Pos>,
        kind: Kind,
        length: usize,
        orientation: Orientation,
    },
    PromotedPowerUp {
        cell: Pos,
        tag: PowerUpTag,
    },
    Removed {
        cells: Vec<Pos>,
    },
    Fell {
        from: Pos,
        to: Pos,
        gem: GemId,
    },
    Spawned {
        cell: Pos,
        gem: GemId,
        kind: Kind,
    },
    ScoreAdded {
        points: u64,
        reason: ScoreReason,
    },
    CascadeLevelEnded {
        level: u32,
    },
    ShuffleBegan,
    ShuffleEnded,
    Deadlock,
    CascadeDepthExceeded {
        depth: u32,
    },
    ShuffleRegenerate,
    PowerUpActivated {
        anchor: Pos,
        tag: PowerUpTag,
        impact: Vec<Pos>,
    },
    AutoHintAvailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreReason {
    Match3,
    Match4,
    Match5,
    Match6,
    MatchLong,
    PowerUpLineClear,
    PowerUpBomb,
    PowerUpColorClear,
}

pub type EventLog = Vec<Event>;
