//! Balls in the air: catch or drop, then tag-ups and double-offs.

use rand::Rng;
use serde_json::json;

use super::advancement::{self, deliver, expected_delivery};
use super::{PlayPhase, PlayState};
use crate::engine::baserunning::{is_safe, time_to_base, time_to_return, RunType};
use crate::engine::batted_ball::{BattedBall, BattedBallType};
use crate::engine::physics_constants::{catch, field, fielding as fc};
use crate::error::{Result, SimError};
use crate::models::attributes::FielderAttributes;
use crate::models::field::{Base, FieldPoint};
use crate::models::fielder::{Defense, Fielder};
use crate::models::play::{PlayEventKind, PlayOutcome};
use crate::models::runner::BaseRunner;

fn caught_outcome(state: &PlayState, ball: &BattedBall, outs_before: u8) -> PlayOutcome {
    match ball.ball_type {
        BattedBallType::PopUp => {
            let infield = ball.landing_point.distance_from_home() <= field::INFIELD_RADIUS_FT;
            let runners_on = state.bases.is_occupied(Base::First) && state.bases.is_occupied(Base::Second);
            if infield && runners_on && outs_before < 2 && ball.is_fair() {
                PlayOutcome::InfieldFly
            } else {
                PlayOutcome::PopOut
            }
        }
        BattedBallType::LineDrive => PlayOutcome::LineOut,
        BattedBallType::FlyBall | BattedBallType::GroundBall => PlayOutcome::FlyOut,
    }
}

/// Throw a runner who strayed on a caught liner back out, if one can be had.
fn double_off<R: Rng + ?Sized>(
    state: &mut PlayState,
    fielder: &Fielder,
    point: &FieldPoint,
    catch_s: f64,
    rng: &mut R,
) {
    // Runner with the worst race back to the bag
    let mut best: Option<(Base, f64, f64)> = None;
    for runner in state.bases.lead_first() {
        let back = catch_s + time_to_return(&runner.profile(), runner.base);
        let ball = catch_s + expected_delivery(fielder, point, runner.base, false);
        let cushion = back - ball;
        if cushion > 0.0 && best.map_or(true, |(_, c, _)| cushion > c) {
            best = Some((runner.base, cushion, back));
        }
    }
    let Some((base, _, back)) = best else { return };

    let ball_s = deliver(state, fielder, point, base, catch_s, false, rng);
    if !is_safe(back, ball_s) {
        if let Some(runner) = state.bases.take(base) {
            state.record_out(ball_s, runner.id, base);
        }
    }
}

/// Runner on third tags and tries to score if the throw home should not
/// beat them. Returns whether a run scored.
fn tag_from_third<R: Rng + ?Sized>(
    state: &mut PlayState,
    fielder: &Fielder,
    point: &FieldPoint,
    catch_s: f64,
    rng: &mut R,
) -> Result<bool> {
    let Some(runner) = state.bases.get(Base::Third) else { return Ok(false) };
    let run_s = catch_s + time_to_base(&runner.profile(), Base::Third, Base::Scored, RunType::TagUp, true)?;

    // Runners read the throw against a typical arm
    let typical = Fielder { attributes: FielderAttributes::default(), ..fielder.clone() };
    let expected_ball_s = catch_s + expected_delivery(&typical, point, Base::Scored, false);
    if run_s > expected_ball_s {
        return Ok(false);
    }

    let Some(runner) = state.bases.take(Base::Third) else { return Ok(false) };
    state.log.push(catch_s, PlayEventKind::TagUp, json!({ "runner": runner.id, "from": Base::Third }));
    let ball_s = deliver(state, fielder, point, Base::Scored, catch_s, false, rng);
    if is_safe(run_s, ball_s) {
        state.score(run_s, runner.id);
        Ok(true)
    } else {
        state.record_out(ball_s, runner.id, Base::Scored);
        Ok(false)
    }
}

pub(crate) fn resolve<R: Rng + ?Sized>(
    state: &mut PlayState,
    ball: &BattedBall,
    defense: &Defense,
    batter: &BaseRunner,
    rng: &mut R,
) -> Result<PlayOutcome> {
    state.enter(PlayPhase::FieldingAttempt);
    let point = ball.landing_point;
    let hang = ball.hang_time_s;

    let (fielder, attempt) = defense
        .assign_fielder(&point, hang)
        .ok_or_else(|| SimError::InvariantViolation("defense has no fielders".into()))?;
    state.log.push(
        0.0,
        PlayEventKind::FielderAssigned,
        json!({
            "fielder": fielder.id,
            "position": fielder.position,
            "arrival_s": attempt.fielder_time_s,
            "margin_s": attempt.margin_s(),
        }),
    );
    state.log.push(
        hang,
        PlayEventKind::CatchAttempt,
        json!({ "fielder": fielder.id, "probability": attempt.probability, "direction": attempt.direction }),
    );

    if rng.gen::<f64>() < attempt.probability {
        state.log.push(hang, PlayEventKind::BallCaught, json!({ "fielder": fielder.id }));
        let outs_before = state.outs;
        let mut outcome = caught_outcome(state, ball, outs_before);
        state.record_out(hang, batter.id, Base::Home);

        if !state.inning_over() {
            state.enter(PlayPhase::ReturnThrow);
            if ball.ball_type == BattedBallType::LineDrive {
                double_off(state, fielder, &point, hang, rng);
            } else if outcome != PlayOutcome::InfieldFly
                && !state.inning_over()
                && tag_from_third(state, fielder, &point, hang, rng)?
            {
                outcome = PlayOutcome::SacrificeFly;
            }
        }
        return Ok(match state.outs_recorded {
            2 => PlayOutcome::DoublePlay,
            3 => PlayOutcome::TriplePlay,
            _ => outcome,
        });
    }

    state.log.push(hang, PlayEventKind::BallDropped, json!({ "fielder": fielder.id }));
    state.log.push(hang, PlayEventKind::BallLanded, json!({ "x_ft": point.x, "y_ft": point.y }));
    if !ball.is_fair() {
        state.log.push(hang, PlayEventKind::FoulBall, json!({ "spray_deg": ball.landing_spray_deg }));
        return Ok(PlayOutcome::FoulBall);
    }
    if attempt.margin_s() >= catch::ERROR_MARGIN {
        return advancement::error_advance(state, batter);
    }

    let secured = attempt.secured_time_s() + fc::PICKUP_TIME;
    let label = if ball.ball_type == BattedBallType::LineDrive { PlayOutcome::LineOut } else { PlayOutcome::FlyOut };
    advancement::resolve_hit(state, fielder, &point, secured, batter, label, rng)
}
