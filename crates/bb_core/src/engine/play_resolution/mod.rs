//! Play Resolution Orchestrator
//!
//! Turns a batted ball into a discrete play outcome. A play moves through
//! explicit phases:
//!
//! ```text
//! BallInFlight → FieldingAttempt → ReturnThrow → AdvancementResolution → Terminal
//! ```
//!
//! Runners are always handled lead-first, and the batter is placed last so
//! base occupancy is read before it is written.

mod advancement;
mod fly_ball;
mod ground_ball;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, trace};

use super::batted_ball::{simulate_batted_ball, BattedBall};
use super::collision::{collide, ContactEvent};
use super::config::SimConfig;
use super::environment::Environment;
use super::pitch::{simulate_pitch_on_target, Handedness, PitchSpec, PitchType, PlateLocation, ReleasePoint};
use super::swing::sample_swing;
use crate::error::{Result, SimError};
use crate::models::attributes::{HitterAttributes, PitcherAttributes};
use crate::models::field::Base;
use crate::models::fielder::Defense;
use crate::models::play::{PlayEventKind, PlayLog, PlayOutcome, PlayResult};
use crate::models::runner::{BaseRunner, BaseState};

/// Outs per half-inning.
pub const OUTS_PER_INNING: u8 = 3;

/// Shared, read-only inputs for resolving plays.
#[derive(Debug, Clone, Copy)]
pub struct PlayContext<'a> {
    pub environment: &'a Environment,
    pub config: &'a SimConfig,
}

impl<'a> PlayContext<'a> {
    pub fn new(environment: &'a Environment, config: &'a SimConfig) -> Self {
        Self { environment, config }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayPhase {
    BallInFlight,
    FieldingAttempt,
    ReturnThrow,
    AdvancementResolution,
    Terminal,
}

/// Working state of one play.
pub(crate) struct PlayState {
    phase: PlayPhase,
    pub(crate) log: PlayLog,
    pub(crate) bases: BaseState,
    /// Outs in the inning, including the ones made on this play
    pub(crate) outs: u8,
    pub(crate) outs_recorded: u8,
    pub(crate) runs: u8,
    debug: bool,
}

impl PlayState {
    fn new(bases: BaseState, outs: u8, debug: bool) -> Self {
        Self {
            phase: PlayPhase::BallInFlight,
            log: PlayLog::default(),
            bases,
            outs,
            outs_recorded: 0,
            runs: 0,
            debug,
        }
    }

    pub(crate) fn enter(&mut self, phase: PlayPhase) {
        if self.debug {
            trace!(from = ?self.phase, to = ?phase, "play phase");
        }
        self.phase = phase;
    }

    pub(crate) fn inning_over(&self) -> bool {
        self.outs >= OUTS_PER_INNING
    }

    pub(crate) fn record_out(&mut self, time_s: f64, runner_id: u32, base: Base) {
        self.outs += 1;
        self.outs_recorded += 1;
        self.log.push(
            time_s,
            PlayEventKind::RunnerOut,
            json!({ "runner": runner_id, "base": base, "outs": self.outs }),
        );
    }

    pub(crate) fn score(&mut self, time_s: f64, runner_id: u32) {
        self.runs += 1;
        self.log.push(time_s, PlayEventKind::RunScored, json!({ "runner": runner_id }));
    }
}

fn validate(batter: &BaseRunner, outs: u8) -> Result<()> {
    if outs >= OUTS_PER_INNING {
        return Err(SimError::config("outs", format!("{outs} outs, the inning is over")));
    }
    if batter.base != Base::Home {
        return Err(SimError::config("batter", format!("batter starts at {:?}, expected Home", batter.base)));
    }
    Ok(())
}

fn home_run(state: &mut PlayState, ball: &BattedBall, batter: &BaseRunner) -> PlayOutcome {
    let t = ball.hang_time_s;
    state.log.push(t, PlayEventKind::HomeRun, json!({ "distance_ft": ball.distance_ft, "batter": batter.id }));
    state.enter(PlayPhase::AdvancementResolution);
    for base in [Base::Third, Base::Second, Base::First] {
        if let Some(runner) = state.bases.take(base) {
            state.score(t, runner.id);
        }
    }
    state.score(t, batter.id);
    PlayOutcome::HomeRun
}

/// Resolve a batted ball against the defense.
///
/// `bases` and `outs` are the situation before contact. Randomness (catch
/// draws, throwing error) comes only from `rng`.
#[allow(clippy::too_many_arguments)]
pub fn resolve_play<R: Rng + ?Sized>(
    ctx: &PlayContext<'_>,
    ball: &BattedBall,
    contact: &ContactEvent,
    defense: &Defense,
    bases: &BaseState,
    batter: &BaseRunner,
    outs: u8,
    rng: &mut R,
) -> Result<PlayResult> {
    validate(batter, outs)?;
    let mut state = PlayState::new(bases.clone(), outs, ctx.config.debug_enabled());

    state.log.push(
        0.0,
        PlayEventKind::BallHit,
        json!({
            "exit_velocity_mph": ball.exit_velocity_mph,
            "launch_angle_deg": ball.launch_angle_deg,
            "spray_angle_deg": ball.spray_angle_deg,
            "ball_type": ball.ball_type,
        }),
    );

    let outcome = if ball.clears_fence() {
        home_run(&mut state, ball, batter)
    } else if let Some(path) = &ball.ground_path {
        ground_ball::resolve(&mut state, ball, path, defense, batter, rng)?
    } else {
        fly_ball::resolve(&mut state, ball, defense, batter, rng)?
    };
    state.enter(PlayPhase::Terminal);

    if state.debug {
        debug!(
            outcome = ?outcome,
            runs = state.runs,
            outs = state.outs_recorded,
            events = state.log.events().len(),
            "play resolved"
        );
    }

    Ok(PlayResult {
        outcome,
        runs_scored: state.runs,
        outs_recorded: state.outs_recorded,
        bases: state.bases,
        events: state.log.into_events(),
        batted_ball: ball.trajectory.summary,
        contact: *contact,
    })
}

/// Pitcher and batter for one ball in play.
#[derive(Debug, Clone)]
pub struct AtBatSetup<'a> {
    pub pitcher: &'a PitcherAttributes,
    pub pitcher_hand: Handedness,
    pub pitch_type: PitchType,
    pub target: PlateLocation,
    pub hitter: &'a HitterAttributes,
    pub batter: &'a BaseRunner,
    pub defense: &'a Defense,
    pub bases: &'a BaseState,
    pub outs: u8,
}

/// Pitch, swing, collision, flight and play resolution from one seed.
pub fn simulate_at_bat_contact(ctx: &PlayContext<'_>, setup: &AtBatSetup<'_>, seed: u64) -> Result<PlayResult> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let spec = PitchSpec::from_pitcher(
        setup.pitch_type,
        setup.pitcher_hand,
        &setup.pitcher.profile(),
        setup.target,
        &mut rng,
    );
    let pitch = simulate_pitch_on_target(&spec, &ReleasePoint::default(), ctx.environment, ctx.config)?;
    let swing = sample_swing(&setup.hitter.profile(), &pitch, &mut rng);
    let contact = collide(&swing.input)?;
    let ball = simulate_batted_ball(&contact, ctx.environment, ctx.config)?;
    resolve_play(ctx, &ball, &contact, setup.defense, setup.bases, setup.batter, setup.outs, &mut rng)
}
