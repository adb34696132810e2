//! Error taxonomy.
//!
//! User-level errors are returned from the offending call with the engine
//! state unchanged. Operational conditions are instead surfaced as `Event`s
//! in the resolution log; the call still returns `Ok`. Invariant violations
//! are handled by validating *before* committing a mutation (so there is
//! nothing to roll back in the common path); if one is nonetheless detected
//! post-commit, the engine marks itself `Poisoned` and rejects further
//! calls until `load_snapshot` succeeds.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SwapError {
    #[error("cells are not adjacent")]
    NotAdjacent,
    #[error("swap produced no match")]
    NoMatch,
    #[error("cell is out of bounds")]
    OutOfBounds,
    #[error("engine is busy or poisoned")]
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActivationError {
    #[error("cell does not hold a power-up")]
    NotPowerUp,
    #[error("cell is out of bounds")]
    OutOfBounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HintError {
    #[error("no legal moves are available")]
    NoLegalMoves,
    #[error("hint cooldown has not elapsed ({remaining_ms}ms remaining)")]
    CooldownActive { remaining_ms: u32 },
    #[error("hint budget exhausted at the final level")]
    BudgetExhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("snapshot version mismatch")]
    VersionMismatch,
    #[error("snapshot data is corrupt")]
    CorruptSnapshot,
    #[error("snapshot board size does not match the engine's configured size")]
    SizeMismatch,
}

/// An invariant violation detected by the engine. In debug builds these are
/// expected to be unreachable (the state machine validates before it ever
/// produces one); in release builds the engine degrades to `Poisoned`
/// rather than propagating corrupt state.
#[derive(Debug, Clone, Error)]
pub enum EngineFault {
    #[error("duplicate gem id detected on the board")]
    DuplicateGemId,
    #[error("board has empty cells at rest")]
    EmptyCellsAtRest,
    #[error("board has a residual match at rest")]
    ResidualMatchAtRest,
    #[error("corrupt board structure: {0}")]
    CorruptBoard(String),
}
