//! Mode orchestrator
//!
//! Drives one `GameState` per mode invocation against the host collaborators
//! and reports the result. This is the only place that loops over ticks.

use crate::lights::IndicatorFrame;
use crate::platform::{IndicatorLights, InputSource, Pacer, RenderSink};
use crate::sim::{Difficulty, GameEvent, GameState, ModeConfig, Outcome, tick};

/// Host side of a mode run
pub struct Collaborators<'a> {
    pub input: &'a mut dyn InputSource,
    pub render: &'a mut dyn RenderSink,
    pub lights: &'a mut dyn IndicatorLights,
    pub pacer: &'a mut dyn Pacer,
    /// Wall-clock period handed to the pacer
    pub tick_period_ms: u64,
}

/// Boss mode result as seen by the campaign
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossOutcome {
    PlayerEscaped,
    PlayerDefeated,
}

/// Summary of a finished mode run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeReport {
    pub outcome: Outcome,
    pub score: u32,
    pub lives: u32,
    pub tiles: u32,
    pub elapsed_ms: u64,
}

impl ModeReport {
    /// Survival time in seconds, for the leaderboard
    pub fn survived_secs(&self) -> f32 {
        match self.outcome {
            Outcome::Failed { survived_ms, .. } => survived_ms as f32 / 1000.0,
            _ => self.elapsed_ms as f32 / 1000.0,
        }
    }
}

/// Forward pending ops and light frames to the collaborators
fn flush(state: &mut GameState, io: &mut Collaborators<'_>) {
    for op in state.drain_render_ops() {
        io.render.apply(&op);
    }
    for event in state.drain_events() {
        match event {
            GameEvent::Indicators(frame) => io.lights.show(&frame),
            GameEvent::Milestone(milestone) => log::info!("Tutorial milestone: {milestone:?}"),
            other => log::trace!("{other:?}"),
        }
    }
}

/// Run a mode from its opening tile until it finishes
pub fn run_mode(io: &mut Collaborators<'_>, config: ModeConfig, seed: u64) -> ModeReport {
    let mut state = GameState::new(config, seed);
    flush(&mut state, io);

    let outcome = loop {
        let input = io.input.sample();
        tick(&mut state, &input);
        flush(&mut state, io);

        if let Some(outcome) = state.outcome() {
            break outcome;
        }
        io.pacer.wait_tick(io.tick_period_ms);
    };

    // Lights never outlive the mode
    io.lights.show(&IndicatorFrame::OFF);

    ModeReport {
        outcome,
        score: state.player.score,
        lives: state.player.lives,
        tiles: state.tile_count,
        elapsed_ms: state.now_ms,
    }
}

/// Tutorial: ends once the goal is met
pub fn run_tutorial(io: &mut Collaborators<'_>, seed: u64) {
    let report = run_mode(io, ModeConfig::tutorial(), seed);
    log::info!(
        "Tutorial complete: {} points over {} tiles",
        report.score,
        report.tiles
    );
}

/// Timed normal run; true when the target score was reached
pub fn run_normal(
    io: &mut Collaborators<'_>,
    difficulty: Difficulty,
    run_index: u32,
    seed: u64,
) -> bool {
    let report = run_mode(io, ModeConfig::normal(difficulty, run_index), seed);
    report.outcome.is_success()
}

/// Survive the chaser until the timer runs out
pub fn run_boss(io: &mut Collaborators<'_>, seed: u64) -> BossOutcome {
    let report = run_mode(io, ModeConfig::boss(), seed);
    if report.outcome.is_success() {
        BossOutcome::PlayerEscaped
    } else {
        BossOutcome::PlayerDefeated
    }
}
