//! Balls on the ground: infield plays, force outs and double plays.

use rand::Rng;
use serde_json::json;

use super::advancement::{self, ceiling_behind, deliver, expected_delivery, runner_time, settle, Advance};
use super::{PlayPhase, PlayState};
use crate::engine::baserunning::is_safe;
use crate::engine::batted_ball::BattedBall;
use crate::engine::fielding::{self, Intercept};
use crate::engine::ground_ball::GroundBallPath;
use crate::engine::physics_constants::{baserunning as br, catch, fielding as fc};
use crate::error::{Result, SimError};
use crate::models::field::{Base, DefensivePosition, FieldPoint};
use crate::models::fielder::{Defense, Fielder};
use crate::models::play::{PlayEventKind, PlayOutcome};
use crate::models::runner::BaseRunner;

/// Infielder with the best chance at the grounder.
fn best_infield_attempt<'a>(defense: &'a Defense, path: &GroundBallPath) -> Option<(&'a Fielder, Intercept)> {
    defense
        .iter()
        .filter(|f| f.position.is_infielder())
        .map(|f| (f, fielding::ground_ball_intercept(f, path)))
        .max_by(|(_, a), (_, b)| a.probability.total_cmp(&b.probability))
}

/// Outfielder who runs down a ball that got through, with where and when.
fn retrieve<'a>(defense: &'a Defense, path: &GroundBallPath) -> Option<(&'a Fielder, FieldPoint, f64)> {
    defense
        .iter()
        .filter(|f| f.position.is_outfielder())
        .map(|f| {
            let (point, t) = fielding::chase_down(f, path);
            (f, point, t)
        })
        .min_by(|a, b| a.2.total_cmp(&b.2))
}

/// Forced runners lead-first, then the batter, each bound for the next base.
fn force_chain(state: &mut PlayState, batter: &BaseRunner) -> Result<Vec<Advance>> {
    let forced = state.bases.forced_runners(true);
    let mut chain = Vec::with_capacity(forced.len() + 1);
    for &base in forced.iter().rev() {
        let Some(runner) = state.bases.take(base) else { continue };
        let target = base.next().unwrap_or(Base::Scored);
        let arrival_s = runner_time(&runner.profile(), base, target)?;
        chain.push(Advance { runner, origin: base, target, arrival_s, forced: true, out: false });
    }
    let arrival_s = runner_time(&batter.profile(), Base::Home, Base::First)?;
    chain.push(Advance {
        runner: batter.clone(),
        origin: Base::Home,
        target: Base::First,
        arrival_s,
        forced: true,
        out: false,
    });
    Ok(chain)
}

/// Throw to the lead force that can be won, then relay down the chain while
/// each relay is expected to beat its runner.
///
/// Returns the index of the first target and, if the inning ended, the time
/// of the third out.
#[allow(clippy::too_many_arguments)]
fn turn_force<'a, R: Rng + ?Sized>(
    state: &mut PlayState,
    chain: &mut [Advance],
    fielder: &'a Fielder,
    point: &FieldPoint,
    fielded_s: f64,
    defense: &'a Defense,
    rng: &mut R,
) -> Result<(usize, Option<f64>)> {
    let last = chain.len().saturating_sub(1);
    let start = chain
        .iter()
        .position(|a| fielded_s + expected_delivery(fielder, point, a.target, false) < a.arrival_s)
        .unwrap_or(last);

    let mut holder = fielder;
    let mut from = *point;
    let mut at = fielded_s;
    for (k, adv) in chain.iter_mut().enumerate().skip(start) {
        let relay = k > start;
        if relay && at + expected_delivery(holder, &from, adv.target, true) >= adv.arrival_s {
            break;
        }
        let ball_s = deliver(state, holder, &from, adv.target, at, relay, rng);
        if !is_safe(adv.arrival_s, ball_s) {
            adv.out = true;
            state.record_out(ball_s, adv.runner.id, adv.target);
            if state.inning_over() {
                return Ok((start, Some(ball_s)));
            }
        }
        holder = defense
            .get(DefensivePosition::covering(adv.target))
            .ok_or_else(|| SimError::InvariantViolation(format!("nobody covers {:?}", adv.target)))?;
        from = adv.target.location();
        at = ball_s;
    }
    Ok((start, None))
}

/// Runners not forced take one base if they beat a throw there with room to
/// spare. Taken lead-first so nobody passes a runner who holds.
fn unforced_advances(
    state: &mut PlayState,
    fielder: &Fielder,
    point: &FieldPoint,
    fielded_s: f64,
) -> Result<Vec<Advance>> {
    let mut plan = Vec::new();
    let mut ceiling = Base::Scored;
    for base in [Base::Third, Base::Second, Base::First] {
        let Some(runner) = state.bases.take(base) else { continue };
        let next = base.next().unwrap_or(Base::Scored);
        let t = runner_time(&runner.profile(), base, next)?;
        let eta = fielded_s + expected_delivery(fielder, point, next, false);
        let adv = if next <= ceiling && t + br::ADVANCE_SAFETY_MARGIN <= eta {
            Advance { runner, origin: base, target: next, arrival_s: t, forced: false, out: false }
        } else {
            Advance::hold(runner)
        };
        ceiling = ceiling_behind(adv.target);
        plan.push(adv);
    }
    Ok(plan)
}

fn field_cleanly<R: Rng + ?Sized>(
    state: &mut PlayState,
    fielder: &Fielder,
    attempt: &Intercept,
    defense: &Defense,
    batter: &BaseRunner,
    rng: &mut R,
) -> Result<PlayOutcome> {
    let fielded_s = attempt.secured_time_s();
    let point = attempt.point;
    state.log.push(
        fielded_s,
        PlayEventKind::BallFielded,
        json!({ "fielder": fielder.id, "x_ft": point.x, "y_ft": point.y }),
    );

    state.enter(PlayPhase::ReturnThrow);
    let mut chain = force_chain(state, batter)?;
    let (start, third_out_s) = turn_force(state, &mut chain, fielder, &point, fielded_s, defense, rng)?;

    state.enter(PlayPhase::AdvancementResolution);
    let straight_to_first = start + 1 == chain.len();
    let batter_out = chain.last().is_some_and(|a| a.out);
    let mut plan = unforced_advances(state, fielder, &point, fielded_s)?;
    plan.extend(chain);
    // Every out on a grounder is a force or the batter at first
    settle(state, plan, third_out_s.map(|t| (t, true)))?;

    Ok(match (straight_to_first, batter_out, state.outs_recorded) {
        (true, true, _) => PlayOutcome::GroundOut,
        (true, false, _) => PlayOutcome::Single,
        (false, _, 0) => PlayOutcome::FieldersChoice,
        (false, _, 1) => PlayOutcome::ForceOut,
        (false, _, 2) => PlayOutcome::DoublePlay,
        (false, _, _) => PlayOutcome::TriplePlay,
    })
}

pub(crate) fn resolve<R: Rng + ?Sized>(
    state: &mut PlayState,
    ball: &BattedBall,
    path: &GroundBallPath,
    defense: &Defense,
    batter: &BaseRunner,
    rng: &mut R,
) -> Result<PlayOutcome> {
    if !ball.is_fair() {
        state.log.push(
            path.bounce_time_s,
            PlayEventKind::FoulBall,
            json!({ "spray_deg": ball.landing_spray_deg }),
        );
        return Ok(PlayOutcome::FoulBall);
    }

    state.enter(PlayPhase::FieldingAttempt);
    let (fielder, attempt) = best_infield_attempt(defense, path)
        .ok_or_else(|| SimError::InvariantViolation("defense has no infielders".into()))?;

    if attempt.point.distance_from_home() <= fc::INFIELD_REACH_FT {
        state.log.push(
            0.0,
            PlayEventKind::FielderAssigned,
            json!({ "fielder": fielder.id, "position": fielder.position, "margin_s": attempt.margin_s() }),
        );
        state.log.push(
            attempt.ball_time_s,
            PlayEventKind::CatchAttempt,
            json!({ "fielder": fielder.id, "probability": attempt.probability, "direction": attempt.direction }),
        );
        if rng.gen::<f64>() < attempt.probability {
            return field_cleanly(state, fielder, &attempt, defense, batter, rng);
        }
        state.log.push(attempt.ball_time_s, PlayEventKind::BallDropped, json!({ "fielder": fielder.id }));
        if attempt.margin_s() >= catch::ERROR_MARGIN {
            return advancement::error_advance(state, batter);
        }
    }

    // Through the infield
    let (outfielder, point, t) =
        retrieve(defense, path).ok_or_else(|| SimError::InvariantViolation("defense has no outfielders".into()))?;
    state.log.push(
        0.0,
        PlayEventKind::FielderAssigned,
        json!({ "fielder": outfielder.id, "position": outfielder.position, "arrival_s": t }),
    );
    let secured = t + fc::PICKUP_TIME;
    state.log.push(
        secured,
        PlayEventKind::BallFielded,
        json!({ "fielder": outfielder.id, "x_ft": point.x, "y_ft": point.y }),
    );
    advancement::resolve_hit(state, outfielder, &point, secured, batter, PlayOutcome::GroundOut, rng)
}
