//! Runner advancement once the ball is loose: hits, errors, and getting the
//! ball to a bag.

use rand::Rng;
use serde_json::json;

use super::{PlayPhase, PlayState};
use crate::engine::baserunning::{is_safe, time_to_base, RunType};
use crate::engine::fielding;
use crate::engine::physics_constants::{baserunning as br, fielding as fc};
use crate::engine::throwing;
use crate::error::{Result, SimError};
use crate::models::attributes::RunnerProfile;
use crate::models::field::{Base, DefensivePosition, FieldPoint};
use crate::models::fielder::Fielder;
use crate::models::play::{PlayEventKind, PlayOutcome};
use crate::models::runner::BaseRunner;

/// One runner's (or the batter's) part in a play.
#[derive(Debug, Clone)]
pub(crate) struct Advance {
    pub runner: BaseRunner,
    pub origin: Base,
    pub target: Base,
    /// Time the runner reaches `target`, from contact
    pub arrival_s: f64,
    pub forced: bool,
    pub out: bool,
}

impl Advance {
    pub fn hold(runner: BaseRunner) -> Self {
        let origin = runner.base;
        Self { runner, origin, target: origin, arrival_s: 0.0, forced: false, out: false }
    }

    pub fn moved(&self) -> bool {
        self.target != self.origin
    }
}

/// Contact-relative time for a runner to get from `origin` to `target`.
pub(crate) fn runner_time(profile: &RunnerProfile, origin: Base, target: Base) -> Result<f64> {
    let run_type = if origin == Base::Home { RunType::Batter } else { RunType::FromLead };
    time_to_base(profile, origin, target, run_type, target != Base::First)
}

fn carries_to_bag(holder: &Fielder, from: &FieldPoint, base: Base) -> bool {
    holder.position == DefensivePosition::covering(base) || from.distance_to(&base.location()) <= fc::STEP_ON_BAG_FT
}

fn carry_time(holder: &Fielder, from: &FieldPoint, base: Base) -> f64 {
    let profile = holder.profile();
    // Already on the move after fielding the ball
    fielding::movement_time(&profile, from, &base.location()) - profile.reaction_s
}

/// Expected time (from securing the ball) to get it to `base`.
pub(crate) fn expected_delivery(holder: &Fielder, from: &FieldPoint, base: Base, relay: bool) -> f64 {
    if carries_to_bag(holder, from, base) {
        return carry_time(holder, from, base);
    }
    let profile = holder.profile();
    let transfer = if relay { fc::PIVOT_TRANSFER } else { profile.transfer_s };
    transfer + throwing::flight_time(profile.arm_mph, from.distance_to(&base.location()))
}

/// Get the ball from `holder` at `from` to `base`, starting at `start_s`.
/// Returns the arrival time, logging any throw.
pub(crate) fn deliver<R: Rng + ?Sized>(
    state: &mut PlayState,
    holder: &Fielder,
    from: &FieldPoint,
    base: Base,
    start_s: f64,
    relay: bool,
    rng: &mut R,
) -> f64 {
    if carries_to_bag(holder, from, base) {
        return start_s + carry_time(holder, from, base);
    }
    let profile = holder.profile();
    let to = base.location();
    let t = if relay {
        throwing::relay(&profile, from, &to, rng)
    } else {
        throwing::throw(&profile, from, &to, rng)
    };
    state.log.push(
        start_s + t.transfer_s,
        PlayEventKind::ThrowReleased,
        json!({ "fielder": holder.id, "to": base, "distance_ft": t.distance_ft }),
    );
    let arrival = start_s + t.total_s();
    state.log.push(
        arrival,
        PlayEventKind::ThrowArrived,
        json!({ "to": base, "error_deg": t.error_deg, "off_target": t.is_off_target() }),
    );
    arrival
}

/// Furthest base ahead of `origin`, no further than `ceiling`, the runner
/// reaches with the safety margin to spare over `eta`. Never short of `min`.
fn furthest_safe_base(
    profile: &RunnerProfile,
    origin: Base,
    min: Base,
    ceiling: Base,
    eta: &dyn Fn(Base) -> f64,
) -> Result<(Base, f64)> {
    let mut best = (min, if min == origin { 0.0 } else { runner_time(profile, origin, min)? });
    let mut next = origin.next();
    while let Some(candidate) = next {
        if candidate > ceiling {
            break;
        }
        let t = runner_time(profile, origin, candidate)?;
        if t + br::ADVANCE_SAFETY_MARGIN > eta(candidate) {
            break;
        }
        if candidate > best.0 {
            best = (candidate, t);
        }
        next = candidate.next();
    }
    Ok(best)
}

/// The highest base a trailing runner may take behind a runner headed to
/// `target`. Any number of runners can score.
pub(crate) fn ceiling_behind(target: Base) -> Base {
    if target == Base::Scored {
        Base::Scored
    } else {
        target.previous().unwrap_or(Base::Home)
    }
}

/// Decide every runner's target given ball arrival times `eta`, lead
/// runner first, then the batter. Runners are taken off `state.bases`.
pub(crate) fn plan_advances(
    state: &mut PlayState,
    batter: &BaseRunner,
    batter_ceiling: Base,
    eta: &dyn Fn(Base) -> f64,
) -> Result<Vec<Advance>> {
    let forced = state.bases.forced_runners(true);
    let mut plan = Vec::new();
    let mut ceiling = Base::Scored;
    for base in [Base::Third, Base::Second, Base::First] {
        let Some(runner) = state.bases.take(base) else { continue };
        let is_forced = forced.contains(&base);
        let min = if is_forced { base.next().unwrap_or(Base::Scored) } else { base };
        let (target, arrival_s) = furthest_safe_base(&runner.profile(), base, min, ceiling, eta)?;
        ceiling = ceiling_behind(target);
        plan.push(Advance { runner, origin: base, target, arrival_s, forced: is_forced, out: false });
    }

    let ceiling = ceiling.min(batter_ceiling);
    if ceiling < Base::First {
        return Err(SimError::InvariantViolation("no base left for the batter".into()));
    }
    let (target, arrival_s) = furthest_safe_base(&batter.profile(), Base::Home, Base::First, ceiling, eta)?;
    plan.push(Advance {
        runner: batter.clone(),
        origin: Base::Home,
        target,
        arrival_s,
        forced: true,
        out: false,
    });
    Ok(plan)
}

/// Whether a run crossing at `arrival_s` counts, given the out that ended
/// the inning (its time, and whether it was a force or the batter at first).
pub(crate) fn run_counts(third_out: Option<(f64, bool)>, arrival_s: f64) -> bool {
    match third_out {
        None => true,
        Some((_, true)) => false,
        Some((t, false)) => arrival_s < t,
    }
}

/// Move runners to their targets: score the ones who crossed the plate,
/// place the rest lead-first with the batter last.
pub(crate) fn settle(state: &mut PlayState, plan: Vec<Advance>, third_out: Option<(f64, bool)>) -> Result<()> {
    for adv in plan {
        if adv.out {
            continue;
        }
        if adv.moved() {
            state.log.push(
                adv.arrival_s,
                PlayEventKind::RunnerAdvanced,
                json!({ "runner": adv.runner.id, "from": adv.origin, "to": adv.target }),
            );
        }
        if adv.target == Base::Scored {
            if run_counts(third_out, adv.arrival_s) {
                state.score(adv.arrival_s, adv.runner.id);
            }
            continue;
        }
        let mut runner = adv.runner;
        runner.base = adv.target;
        state.bases.place(runner)?;
    }
    Ok(())
}

/// Batter reaches first on an error and every runner moves up one base.
pub(crate) fn error_advance(state: &mut PlayState, batter: &BaseRunner) -> Result<PlayOutcome> {
    state.enter(PlayPhase::AdvancementResolution);
    let mut plan = Vec::new();
    for base in [Base::Third, Base::Second, Base::First] {
        let Some(runner) = state.bases.take(base) else { continue };
        let target = base.next().unwrap_or(Base::Scored);
        let arrival_s = runner_time(&runner.profile(), base, target)?;
        plan.push(Advance { runner, origin: base, target, arrival_s, forced: false, out: false });
    }
    let arrival_s = runner_time(&batter.profile(), Base::Home, Base::First)?;
    plan.push(Advance {
        runner: batter.clone(),
        origin: Base::Home,
        target: Base::First,
        arrival_s,
        forced: true,
        out: false,
    });
    settle(state, plan, None)?;
    Ok(PlayOutcome::Error)
}

fn hit_outcome(reached: Base, batter_out_at_first: PlayOutcome) -> PlayOutcome {
    match reached {
        Base::Home => batter_out_at_first,
        Base::First => PlayOutcome::Single,
        Base::Second => PlayOutcome::Double,
        Base::Third => PlayOutcome::Triple,
        Base::Scored => PlayOutcome::HomeRun,
    }
}

/// Resolve a ball that fell in (or got through): `fielder` secures it at
/// `point` at `secured_s` and makes one throw to the tightest base.
///
/// `batter_out_at_first` labels the rare play where that throw beats the
/// batter to first.
#[allow(clippy::too_many_arguments)]
pub(crate) fn resolve_hit<R: Rng + ?Sized>(
    state: &mut PlayState,
    fielder: &Fielder,
    point: &FieldPoint,
    secured_s: f64,
    batter: &BaseRunner,
    batter_out_at_first: PlayOutcome,
    rng: &mut R,
) -> Result<PlayOutcome> {
    state.enter(PlayPhase::AdvancementResolution);
    let eta = |base: Base| secured_s + expected_delivery(fielder, point, base, false);
    let mut plan = plan_advances(state, batter, Base::Third, &eta)?;

    // One throw, to the base where the runner's cushion is smallest
    let tightest = plan
        .iter()
        .enumerate()
        .filter(|(_, a)| a.moved())
        .map(|(i, a)| (i, eta(a.target) - a.arrival_s))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i);

    let mut third_out = None;
    if let Some(i) = tightest {
        let target = plan[i].target;
        let ball_s = deliver(state, fielder, point, target, secured_s, false, rng);
        if !is_safe(plan[i].arrival_s, ball_s) {
            plan[i].out = true;
            state.record_out(ball_s, plan[i].runner.id, target);
            if state.inning_over() {
                let forced = plan[i].forced && plan[i].origin.next() == Some(target);
                third_out = Some((ball_s, forced));
            }
        }
    }

    let batter_adv = plan.last().map(|a| (a.target, a.out)).unwrap_or((Base::First, false));
    let reached = if batter_adv.1 { batter_adv.0.previous().unwrap_or(Base::Home) } else { batter_adv.0 };
    settle(state, plan, third_out)?;
    Ok(hit_outcome(reached, batter_out_at_first))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attributes::{FielderAttributes, RunnerAttributes};
    use crate::models::runner::BaseState;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn runner(id: u32, base: Base) -> BaseRunner {
        BaseRunner::new(id, base, RunnerAttributes::default())
    }

    fn state_with(bases: &[(u32, Base)]) -> PlayState {
        let mut b = BaseState::empty();
        for &(id, base) in bases {
            b.place(runner(id, base)).unwrap();
        }
        PlayState::new(b, 0, false)
    }

    #[test]
    fn test_error_moves_everyone_up_one() {
        let mut s = state_with(&[(1, Base::First), (3, Base::Third)]);
        let outcome = error_advance(&mut s, &runner(10, Base::Home)).unwrap();
        assert_eq!(outcome, PlayOutcome::Error);
        assert_eq!(s.runs, 1);
        assert_eq!(s.bases.get(Base::First).map(|r| r.id), Some(10));
        assert_eq!(s.bases.get(Base::Second).map(|r| r.id), Some(1));
        assert!(!s.bases.is_occupied(Base::Third));
    }

    #[test]
    fn test_runners_never_pass_each_other() {
        let mut s = state_with(&[(1, Base::First), (2, Base::Second)]);
        // Ball is slow to come back everywhere except third
        let eta = |b: Base| if b == Base::Third { 0.5 } else { 60.0 };
        let plan = plan_advances(&mut s, &runner(10, Base::Home), Base::Third, &eta).unwrap();
        // Runner from second is forced to third, so first's runner stops at second
        assert_eq!(plan[0].target, Base::Third);
        assert_eq!(plan[1].target, Base::Second);
        assert_eq!(plan[2].target, Base::First);
    }

    #[test]
    fn test_gap_shot_clears_the_bases() {
        let mut s = state_with(&[(1, Base::First), (2, Base::Second)]);
        let eta = |_: Base| 60.0;
        let plan = plan_advances(&mut s, &runner(10, Base::Home), Base::Third, &eta).unwrap();
        assert!(plan[..2].iter().all(|a| a.target == Base::Scored));
        assert_eq!(plan[2].target, Base::Third);
    }

    #[test]
    fn test_unforced_runner_can_hold() {
        let mut s = state_with(&[(2, Base::Second)]);
        let eta = |b: Base| if b == Base::First { 60.0 } else { 0.1 };
        let plan = plan_advances(&mut s, &runner(10, Base::Home), Base::Third, &eta).unwrap();
        assert_eq!(plan[0].target, Base::Second);
        assert!(!plan[0].moved());
        assert_eq!(plan[1].target, Base::First);
    }

    #[test]
    fn test_runs_after_force_for_third_out_do_not_count() {
        assert!(run_counts(None, 9.0));
        assert!(!run_counts(Some((5.0, true)), 3.0));
        assert!(run_counts(Some((5.0, false)), 3.0));
        assert!(!run_counts(Some((5.0, false)), 6.0));
    }

    #[test]
    fn test_single_to_the_outfield() {
        let mut s = state_with(&[]);
        let lf = Fielder::new(7, DefensivePosition::LeftField, FielderAttributes::default());
        let point = FieldPoint::new(-150.0, 200.0);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let outcome = resolve_hit(&mut s, &lf, &point, 3.5, &runner(10, Base::Home), PlayOutcome::FlyOut, &mut rng).unwrap();
        assert_eq!(outcome, PlayOutcome::Single);
        assert_eq!(s.bases.get(Base::First).map(|r| r.id), Some(10));
        assert_eq!(s.outs_recorded, 0);
    }

    #[test]
    fn test_carry_when_covering() {
        let first = Fielder::new(3, DefensivePosition::FirstBase, FielderAttributes::default());
        let near_bag = FieldPoint::new(64.5, 66.0);
        let t = expected_delivery(&first, &near_bag, Base::First, false);
        assert!(t < 1.0);
    }
}
