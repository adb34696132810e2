//! Cascade Engine: the iterative DETECT -> PROMOTE -> SCORE -> REMOVE
//! -> GRAVITY -> REFILL loop that resolves a legal swap or a power-up
//! activation, and the Deadlock check that follows SETTLE.

use crate::board::{Board, Cell, Kind, Pos, PowerUpTag};
use crate::config::Config;
use crate::events::{Event, ScoreReason};
use crate::generator::Generator;
use crate::gravity::{apply_gravity, refill};
use crate::match_detect::find_matches;
use crate::powerup::{activation_bonus, impact_set, most_common_kind, tag_for_match};
use hashbrown::HashSet;
use match3_rng::EngineRng;
use std::collections::VecDeque;

/// An explicit power-up activation request fed into the first cascade
/// level, e.g. from a swap-triggered activation or a direct click.
#[derive(Debug, Clone, Copy)]
pub struct PendingActivation {
    pub anchor: Pos,
    pub tag: PowerUpTag,
    pub color_target: Option<Kind>,
}

/// Builds the [`PendingActivation`] list for a swap that landed a power-up
/// at `a` and/or `b`. For each tagged position, the *other* swapped cell's
/// kind supplies the `ColorClear` parameter if it holds one; otherwise the
/// tagged cell is just the anchor.
pub fn activations_from_swap(board: &Board, a: Pos, b: Pos, tagged: &[Pos]) -> Vec<PendingActivation> {
    tagged
        .iter()
        .filter_map(|&pos| {
            let gem = board.get(pos).gem()?;
            let tag = gem.power_up?;
            let other = if pos == a { b } else { a };
            let color_target = board.get(other).gem().map(|g| g.kind);
            Some(PendingActivation {
                anchor: pos,
                tag,
                color_target,
            })
        })
        .collect()
}

/// Outcome of a full cascade resolution.
#[derive(Debug, Clone, Default)]
pub struct CascadeOutcome {
    pub events: Vec<Event>,
    pub score_delta: u64,
    pub levels: u32,
}

/// Runs the cascade resolution loop to completion (it never suspends).
/// `initial_activations` seeds level 1 with any power-ups the Swap Engine
/// or a direct click determined should activate before ordinary match
/// resolution begins.
pub fn resolve(
    board: &mut Board,
    gen: &Generator,
    rng: &mut EngineRng,
    config: &Config,
    mut initial_activations: Vec<PendingActivation>,
) -> CascadeOutcome {
    let mut outcome = CascadeOutcome::default();
    let mut combo: u32 = 0;
    let mut cascade_depth: u32 = 0;

    loop {
        combo += 1;
        let (level_events, level_score, activity) = run_level(
            board,
            gen,
            rng,
            config,
            combo,
            cascade_depth,
            core::mem::take(&mut initial_activations),
        );
        outcome.events.extend(level_events);
        outcome.score_delta += level_score;

        if !activity {
            break;
        }

        cascade_depth += 1;
        outcome.levels = combo;
        outcome.events.push(Event::CascadeLevelEnded { level: combo });

        if cascade_depth > config.cascade_depth_cap {
            outcome
                .events
                .push(Event::CascadeDepthExceeded { depth: cascade_depth });
            break;
        }
    }

    outcome
}

#[allow(clippy::too_many_arguments)]
fn run_level(
    board: &mut Board,
    gen: &Generator,
    rng: &mut EngineRng,
    config: &Config,
    combo: u32,
    cascade_depth: u32,
    explicit_activations: Vec<PendingActivation>,
) -> (Vec<Event>, u64, bool) {
    let mut events = Vec::new();
    let mut pending: HashSet<Pos> = HashSet::new();
    let mut activation_points: u64 = 0;

    let runs = find_matches(board);
    for run in &runs {
        events.push(Event::Matched {
            cells: run.cells.clone(),
            kind: run.kind,
            length: run.len(),
            orientation: run.orientation,
        });
    }

    let mut activation_queue: VecDeque<PendingActivation> =
        explicit_activations.into_iter().collect();

    // PROMOTE: matches of length >= 4 create a power-up at the match's
    // center cell and clear the rest of the run.
    for run in &runs {
        if let Some(tag) = tag_for_match(run.len(), run.orientation) {
            let center = run.center();
            for &pos in &run.cells {
                if pos != center {
                    pending.insert(pos);
                }
            }
            let kind = run.kind;
            let promoted_id = board.fresh_id();
            board.set(
                center,
                Cell::Occupied(crate::board::Gem::with_power_up(promoted_id, kind, tag)),
            );
            events.push(Event::PromotedPowerUp { cell: center, tag });
            if config.power_up_auto_activate {
                activation_queue.push_back(PendingActivation {
                    anchor: center,
                    tag,
                    color_target: None,
                });
            }
        } else {
            for &pos in &run.cells {
                pending.insert(pos);
            }
        }
    }

    // Chain activation: breadth-first, each power-up activates at most
    // once per cascade level.
    let mut activated: HashSet<Pos> = HashSet::new();
    while let Some(PendingActivation {
        anchor,
        tag,
        color_target,
    }) = activation_queue.pop_front()
    {
        if activated.contains(&anchor) {
            continue;
        }
        activated.insert(anchor);

        let color = color_target.or_else(|| most_common_kind(board));
        let impact = impact_set(board, tag, anchor, color);
        activation_points += activation_bonus(tag, impact.len());
        events.push(Event::PowerUpActivated {
            anchor,
            tag,
            impact: impact.iter().copied().collect(),
        });
        events.push(Event::ScoreAdded {
            points: activation_bonus(tag, impact.len()),
            reason: power_up_reason(tag),
        });

        for &pos in &impact {
            if pos == anchor {
                pending.insert(pos);
                continue;
            }
            if let Some(g) = board.get(pos).gem() {
                if g.is_tagged() && !activated.contains(&pos) {
                    activation_queue.push_back(PendingActivation {
                        anchor: pos,
                        tag: g.power_up.unwrap(),
                        color_target: None,
                    });
                }
            }
            pending.insert(pos);
        }
    }

    let activity = !pending.is_empty();
    let mut level_points = activation_points;

    if !runs.is_empty() {
        let base_total = runs
            .iter()
            .map(|r| config.scoring_profile.base_points(r.len()))
            .sum::<u64>();
        let multiplied =
            (base_total as f64 * config.scoring_profile.combo_multiplier(combo)).round() as u64;
        let depth_bonus = config.scoring_profile.depth_bonus(cascade_depth);
        let total = multiplied + depth_bonus;
        events.push(Event::ScoreAdded {
            points: total,
            reason: reason_for_longest(&runs),
        });
        level_points += total;
    }

    if !pending.is_empty() {
        let cells: Vec<Pos> = pending.iter().copied().collect();
        for &pos in &cells {
            board.set(pos, Cell::Empty);
        }
        events.push(Event::Removed { cells });
        events.extend(apply_gravity(board));
        events.extend(refill(board, gen, rng));
    }

    (events, level_points, activity)
}

fn reason_for_longest(runs: &[crate::match_detect::Run]) -> ScoreReason {
    let longest = runs.iter().map(|r| r.len()).max().unwrap_or(3);
    match longest {
        3 => ScoreReason::Match3,
        4 => ScoreReason::Match4,
        5 => ScoreReason::Match5,
        6 => ScoreReason::Match6,
        _ => ScoreReason::MatchLong,
    }
}

fn power_up_reason(tag: PowerUpTag) -> ScoreReason {
    match tag {
        PowerUpTag::LineH | PowerUpTag::LineV => ScoreReason::PowerUpLineClear,
        PowerUpTag::Bomb3x3 => ScoreReason::PowerUpBomb,
        PowerUpTag::ColorClear => ScoreReason::PowerUpColorClear,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Kind;

    fn gen_all() -> Generator {
        Generator::new(Kind::prefix(7))
    }

    #[test]
    fn simple_match3_scores_and_settles() {
        use Kind::*;
        let mut board = Board::new(8);
        for (c, k) in [A, A, A, B, C, D, E, F].into_iter().enumerate() {
            let gem = board.new_gem(k);
            board.set((0, c), Cell::Occupied(gem));
        }
        let mut rng = EngineRng::new(1);
        let config = Config::default();
        let outcome = resolve(&mut board, &gen_all(), &mut rng, &config, Vec::new());
        assert!(outcome.score_delta >= 50);
        assert!(board.is_full());
        assert!(find_matches(&board).is_empty() || outcome.levels > 1);
    }

    #[test]
    fn cascade_terminates_within_depth_cap() {
        let mut board = Board::new(8);
        let gen = gen_all();
        let mut rng = EngineRng::new(7);
        gen.fill_initial(&mut board, &mut rng);
        let config = Config::default();
        let outcome = resolve(&mut board, &gen, &mut rng, &config, Vec::new());
        assert!(outcome.levels <= config.cascade_depth_cap + 1);
    }

    #[test]
    fn four_match_promotes_line_tag() {
        use Kind::*;
        let mut board = Board::new(8);
        for (c, k) in [A, A, A, A, B, C, D, E].into_iter().enumerate() {
            let gem = board.new_gem(k);
            board.set((0, c), Cell::Occupied(gem));
        }
        let mut rng = EngineRng::new(3);
        let config = Config::default();
        let outcome = resolve(&mut board, &gen_all(), &mut rng, &config, Vec::new());
        let promoted = outcome
            .events
            .iter()
            .any(|e| matches!(e, Event::PromotedPowerUp { tag: PowerUpTag::LineH, .. }));
        assert!(promoted);
    }
}
