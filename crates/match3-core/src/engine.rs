//! The `Engine` facade: the single entry point the outer shell drives.
//!
//! One owned value holding the board, the PRNG, and the derived session
//! state, exposing a small set of `tick`-style calls rather than letting
//! callers reach into the board directly.

use crate::ai::{self, MoveAnalysis};
use crate::board::{Board, Pos};
use crate::cascade::{self, CascadeOutcome};
use crate::config::Config;
use crate::deadlock::{is_deadlocked, legal_moves, shuffle_or_regenerate};
use crate::difficulty::{self, DifficultySettings, PlayerMetrics};
use crate::error::{ActivationError, HintError, LoadError, SwapError};
use crate::events::{Event, EventLog};
use crate::generator::Generator;
use crate::hint::HintSession;
use crate::match_detect::has_any_match;
use crate::powerup::most_common_kind;
use crate::snapshot::{board_from_state, board_to_state, BoardState, GameMode, SNAPSHOT_VERSION};
use crate::swap::{attempt_swap, SwapTrigger};
use match3_rng::EngineRng;

/// Signal raised by [`Engine::tick_time`]: either a mode timer expiring or
/// the inactivity timer clearing for an auto-hint offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeEvent {
    TimeUp,
    AutoHintAvailable,
}

/// Why a session ended, passed to [`Engine::end_game`]. Exposed so the
/// outer shell has somewhere to report a time-up or quit without the core
/// re-inventing a scoring ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    TimeUp,
    PlayerQuit,
}

/// The engine's own record that a session ended; read-only to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOver {
    pub reason: EndReason,
    pub final_score: u64,
}

/// One move-count-limited or time-limited game session, owning the board,
/// the single PRNG, and all derived session state. No gem holds a reference
/// back into this struct or into any UI object.
#[derive(Debug, Clone)]
pub struct Engine {
    board: Board,
    config: Config,
    rng: EngineRng,
    score: u64,
    level: u32,
    mode: GameMode,
    difficulty: DifficultySettings,
    player_metrics: PlayerMetrics,
    hint_session: HintSession,
    poisoned: bool,
    elapsed_ms: u64,
    last_activity_ms: u64,
    auto_hint_fired: bool,
    time_remaining_ms: Option<u32>,
    game_over: Option<GameOver>,
}

impl Engine {
    /// Builds a fresh engine: shapes an initial board, then verifies the
    /// minimum legal-move count and shuffles if the freshly-shaped board is
    /// deadlocked.
    pub fn init(config: Config, mode: GameMode, level: u32, seed: u64) -> Self {
        let mut rng = EngineRng::new(seed);
        let difficulty = DifficultySettings::for_level(level);
        let kinds_allowed = kinds_for(&config, &difficulty);
        let generator = Generator::new(kinds_allowed);

        let mut board = Board::new(config.board_size);
        generator.fill_initial(&mut board, &mut rng);
        sanitize_initial_board(&mut board, &generator, &mut rng, config.cascade_depth_cap);
        difficulty::shape_board(&mut board, &generator, &mut rng, &difficulty);
        if is_deadlocked(&mut board, config.min_legal_moves) {
            shuffle_or_regenerate(
                &mut board,
                &generator,
                &mut rng,
                config.min_legal_moves,
                config.shuffle_attempts_cap,
            );
        }

        let time_remaining_ms = match mode {
            GameMode::TimeAttack | GameMode::DailyChallenge => Some(180_000),
            GameMode::Campaign | GameMode::Endless => None,
        };

        Self {
            hint_session: HintSession::with_board_size(config.hint_cooldown_ms, config.board_size),
            board,
            rng,
            score: 0,
            level,
            mode,
            difficulty,
            player_metrics: PlayerMetrics::default(),
            poisoned: false,
            elapsed_ms: 0,
            last_activity_ms: 0,
            auto_hint_fired: false,
            time_remaining_ms,
            game_over: None,
            config,
        }
    }

    fn generator(&self) -> Generator {
        Generator::new(kinds_for(&self.config, &self.difficulty))
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    pub fn game_over(&self) -> Option<GameOver> {
        self.game_over
    }

    /// Attempts to swap `a` and `b` and, if legal, drives the full cascade
    /// resolution to completion, finishing with the settle-step deadlock
    /// check and shuffle. User-level errors leave the board byte-identical.
    pub fn apply_swap(&mut self, a: Pos, b: Pos) -> Result<EventLog, SwapError> {
        if self.poisoned {
            return Err(SwapError::Busy);
        }

        let trigger = attempt_swap(&mut self.board, a, b)?;
        let activations = match trigger {
            SwapTrigger::Match => Vec::new(),
            SwapTrigger::PowerUpActivation { ref tagged } => {
                cascade::activations_from_swap(&self.board, a, b, tagged)
            }
        };

        let log = self.run_resolution(activations);
        self.note_activity();
        Ok(log)
    }

    /// Activates the power-up at `at` directly, the alternate entry point
    /// for a player clicking a power-up rather than swapping it. The
    /// `ColorClear` target is the board's most common non-power-up kind.
    pub fn activate_power_up(&mut self, at: Pos) -> Result<EventLog, ActivationError> {
        if !self.board.in_bounds(at) {
            return Err(ActivationError::OutOfBounds);
        }
        let gem = self.board.get(at).gem().ok_or(ActivationError::NotPowerUp)?;
        let tag = gem.power_up.ok_or(ActivationError::NotPowerUp)?;
        let color_target = most_common_kind(&self.board);

        let activations = vec![cascade::PendingActivation {
            anchor: at,
            tag,
            color_target,
        }];
        let log = self.run_resolution(activations);
        self.note_activity();
        Ok(log)
    }

    /// Runs the Cascade Engine to completion, appends the SETTLE-step
    /// deadlock check (shuffling the board if needed), folds the score
    /// delta and per-player metrics, and returns the full ordered event log.
    fn run_resolution(&mut self, activations: Vec<cascade::PendingActivation>) -> EventLog {
        let generator = self.generator();
        let CascadeOutcome {
            mut events,
            score_delta,
            levels,
        } = cascade::resolve(
            &mut self.board,
            &generator,
            &mut self.rng,
            &self.config,
            activations,
        );
        self.score += score_delta;
        self.player_metrics.cascade_frequency = levels as f64;
        self.player_metrics.avg_move_score =
            (self.player_metrics.avg_move_score + score_delta as f64) / 2.0;

        if is_deadlocked(&mut self.board, self.config.min_legal_moves) {
            events.push(Event::Deadlock);
            events.extend(shuffle_or_regenerate(
                &mut self.board,
                &generator,
                &mut self.rng,
                self.config.min_legal_moves,
                self.config.shuffle_attempts_cap,
            ));
        }

        events
    }

    /// Enumerates legal moves on the live board; used directly by tests
    /// and indirectly by [`Engine::analyze`].
    pub fn legal_moves(&self) -> Vec<(Pos, Pos)> {
        legal_moves(&mut self.board.clone())
    }

    /// Ranks every legal move by expected value. Uses the fixed AI sandbox
    /// seed so predictions are stable within a turn regardless of the live
    /// session PRNG's position.
    pub fn analyze(&self) -> Vec<MoveAnalysis> {
        self.analyze_with_budget(None)
    }

    pub fn analyze_with_budget(&self, budget_ms: Option<u32>) -> Vec<MoveAnalysis> {
        ai::analyze(
            &self.board,
            &self.generator(),
            &self.config,
            ai::AI_SANDBOX_SEED,
            budget_ms,
        )
    }

    /// Consumes one hint budget unit at the session's current level,
    /// progressing through the level/budget table. Uses the engine's own
    /// elapsed-ms clock (advanced only by [`Engine::tick_time`]) for the
    /// cooldown gate, since the core exposes no suspension points of its own.
    pub fn hint_request(&mut self) -> Result<crate::hint::HintResult, HintError> {
        let ranked = self.analyze();
        let now = self.elapsed_ms;
        let result = self.hint_session.request_hint(now, &ranked)?;
        self.auto_hint_fired = false;
        self.last_activity_ms = now;
        Ok(result)
    }

    /// Advances the engine's internal clock by `ms`. Returns at most one
    /// event: a `TimeUp` if a mode timer just expired, otherwise an
    /// `AutoHintAvailable` once the inactivity timer clears (at most once
    /// per inactivity period; cleared again by the next move or hint).
    pub fn tick_time(&mut self, ms: u32) -> Option<TimeEvent> {
        self.elapsed_ms += ms as u64;

        if let Some(remaining) = self.time_remaining_ms.as_mut() {
            *remaining = remaining.saturating_sub(ms);
            if *remaining == 0 {
                return Some(TimeEvent::TimeUp);
            }
        }

        if !self.auto_hint_fired {
            let idle = self.elapsed_ms.saturating_sub(self.last_activity_ms);
            if idle >= self.config.hint_auto_delay_ms as u64 {
                self.auto_hint_fired = true;
                return Some(TimeEvent::AutoHintAvailable);
            }
        }

        None
    }

    fn note_activity(&mut self) {
        self.last_activity_ms = self.elapsed_ms;
        self.auto_hint_fired = false;
    }

    /// Ends the session, e.g. after a `TimeUp` from [`Engine::tick_time`].
    /// Idempotent: a second call just overwrites the recorded reason.
    pub fn end_game(&mut self, reason: EndReason) -> GameOver {
        let over = GameOver {
            reason,
            final_score: self.score,
        };
        self.game_over = Some(over);
        over
    }

    /// Advances to the next level, deriving fresh difficulty settings and
    /// re-shaping the board, without resetting the score.
    pub fn advance_level(&mut self) {
        self.level += 1;
        self.difficulty = difficulty::adapt_settings(
            DifficultySettings::for_level(self.level),
            &self.player_metrics,
        );
        let generator = self.generator();
        let mut board = Board::new(self.config.board_size);
        generator.fill_initial(&mut board, &mut self.rng);
        sanitize_initial_board(&mut board, &generator, &mut self.rng, self.config.cascade_depth_cap);
        difficulty::shape_board(&mut board, &generator, &mut self.rng, &self.difficulty);
        self.board = board;
    }

    /// Serializes the full session into the persisted `BoardState` blob.
    /// A `snapshot -> load_snapshot -> snapshot` round trip is the identity;
    /// this representation carries everything needed to reconstruct the
    /// engine exactly (modulo in-flight RNG stream position, per
    /// [`match3_rng::EngineRng`]'s own doc comment).
    pub fn snapshot(&self) -> BoardState {
        BoardState {
            version: SNAPSHOT_VERSION,
            n: self.board.n(),
            cells: board_to_state(&self.board),
            score: self.score,
            level: self.level,
            mode: self.mode,
            rng: self.rng.clone(),
            difficulty_settings: self.difficulty,
            hint_session: self.hint_session.clone(),
        }
    }

    /// Restores the engine from a previously captured snapshot. On any
    /// `LoadError`, the engine is left exactly as it was before the call
    /// (the new board is only swapped in once every validation passes).
    pub fn load_snapshot(&mut self, state: BoardState) -> Result<(), LoadError> {
        self.config.validate_against(&state)?;
        let board = board_from_state(state.n, &state.cells)?;

        self.board = board;
        self.score = state.score;
        self.level = state.level;
        self.mode = state.mode;
        self.rng = state.rng;
        self.difficulty = state.difficulty_settings;
        self.hint_session = state.hint_session;
        self.poisoned = false;
        Ok(())
    }
}

/// Removes any residual matches from a freshly filled board without
/// scoring, re-running gravity/refill until none remain (the initial-board
/// sanity pass). Bounded by `depth_cap` as a termination backstop; the
/// placement rule makes more than a couple of passes exceedingly rare.
fn sanitize_initial_board(
    board: &mut Board,
    gen: &Generator,
    rng: &mut EngineRng,
    depth_cap: u32,
) {
    use crate::board::Cell;
    use crate::gravity::{apply_gravity, refill};
    use crate::match_detect::find_matches;

    for _ in 0..=depth_cap {
        if !has_any_match(board) {
            return;
        }
        for run in find_matches(board) {
            for pos in run.cells {
                board.set(pos, Cell::Empty);
            }
        }
        apply_gravity(board);
        refill(board, gen, rng);
    }
}

/// The `K_allow` subset for the current difficulty tier: `Kind::prefix`
/// restricted further by the config's `kinds_total`.
fn kinds_for(config: &Config, difficulty: &DifficultySettings) -> Vec<crate::board::Kind> {
    let n = difficulty.kinds_allowed.min(config.kinds_total);
    crate::board::Kind::prefix(n)
}
