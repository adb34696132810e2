//! match3-core: the deterministic engine core of a match-3 puzzle game.
//!
//! Board model, match detection, gravity/refill, controlled generation,
//! swap legality, cascade resolution, power-ups, deadlock/shuffle,
//! difficulty shaping, AI move analysis, and hint progression — headless,
//! observable only through state snapshots and the event log. No I/O, no
//! rendering, no global mutable state.

pub mod ai;
pub mod board;
pub mod cascade;
pub mod config;
pub mod deadlock;
pub mod difficulty;
pub mod engine;
pub mod error;
pub mod events;
pub mod generator;
pub mod gravity;
pub mod hint;
pub mod match_detect;
pub mod powerup;
pub mod snapshot;
pub mod swap;

pub use ai::{DifficultyTag, MoveAnalysis};
pub use board::{Board, Cell, Gem, GemId, Kind, Pos, PowerUpTag};
pub use config::{AiWeights, Config, ScoringProfile};
pub use engine::{EndReason, Engine, GameOver, TimeEvent};
pub use error::{ActivationError, EngineFault, HintError, LoadError, SwapError};
pub use events::{Event, EventLog, ScoreReason};
pub use hint::{HintResult, HintSession};
pub use match_detect::{Orientation, Run};
pub use snapshot::{BoardState, CellRecord, GameMode};
pub use swap::SwapTrigger;

pub use match3_rng::EngineRng;
