//! Baserunner Timing Model
//!
//! Runs are measured along the base path from the runner's actual base.
//! A runner accelerates out of the lead, holds top speed, gives some of it
//! back at every base rounded, and optionally slides into the last bag.

use serde::{Deserialize, Serialize};

use super::fielding::run_time;
use super::physics_constants::{baserunning as br, field};
use crate::error::{Result, SimError};
use crate::models::attributes::RunnerProfile;
use crate::models::field::Base;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunType {
    /// Running on contact from a lead-off
    FromLead,
    /// Leaving the bag on the catch
    TagUp,
    /// Out of the batter's box
    Batter,
}

/// Standard lead-off (ft) from a base, before the runner's factor.
pub fn lead_off_ft(base: Base) -> f64 {
    match base {
        Base::First => br::LEAD_FIRST_FT,
        Base::Second => br::LEAD_SECOND_FT,
        Base::Third => br::LEAD_THIRD_FT,
        Base::Home | Base::Scored => 0.0,
    }
}

fn validate(origin: Base, target: Base, run_type: RunType) -> Result<()> {
    if target <= origin || origin == Base::Scored || target == Base::Home {
        return Err(SimError::config("target_base", format!("{target:?} is not ahead of {origin:?}")));
    }
    match (origin, run_type) {
        (Base::Home, RunType::Batter) => Ok(()),
        (Base::Home, _) => Err(SimError::config("origin_base", "only the batter starts from home")),
        (_, RunType::Batter) => Err(SimError::config("run_type", "batter must start from home")),
        _ => Ok(()),
    }
}

/// Distance (ft) a runner actually covers from `origin` to `target`.
pub fn path_distance_ft(runner: &RunnerProfile, origin: Base, target: Base, run_type: RunType) -> Result<f64> {
    validate(origin, target, run_type)?;
    let bases = f64::from(target.index() - origin.index());
    let lead = match run_type {
        RunType::FromLead => lead_off_ft(origin) * runner.lead_factor,
        RunType::TagUp | RunType::Batter => 0.0,
    };
    Ok(bases * field::BASE_PATH_FT - lead)
}

/// Time (s) for a runner to reach the slide point `SLIDE_DISTANCE_FT` short
/// of the bag from `arrival_speed`, then finish on the ground.
fn slide_penalty(runner: &RunnerProfile, arrival_speed: f64) -> f64 {
    let d = br::SLIDE_DISTANCE_FT;
    let running = d / arrival_speed;
    // Never decelerate so hard the runner stops short
    let decel = br::SLIDE_DECELERATION.min(arrival_speed * arrival_speed / (2.0 * d));
    let disc = (arrival_speed * arrival_speed - 2.0 * decel * d).max(0.0);
    let sliding = (arrival_speed - disc.sqrt()) / decel;
    (sliding - running).max(0.0) * (1.0 - runner.slide_efficiency)
}

/// Time (s) from contact (or from the catch, on a tag-up) for a runner to
/// go from `origin` to `target`.
pub fn time_to_base(runner: &RunnerProfile, origin: Base, target: Base, run_type: RunType, slide: bool) -> Result<f64> {
    let total = path_distance_ft(runner, origin, target, run_type)?;
    let start = match run_type {
        RunType::FromLead => runner.reaction_s,
        RunType::TagUp => 0.0,
        RunType::Batter => runner.reaction_s + br::BATTER_FOLLOW_THROUGH,
    };

    let top = runner.sprint_speed_fps;
    let first_leg = total - field::BASE_PATH_FT * f64::from(target.index() - origin.index() - 1);
    let mut time = start + run_time(first_leg, top, runner.acceleration_fps2);

    // Each rounded base drops the runner to the retained speed for the next leg
    let turns = target.index() - origin.index() - 1;
    let speed = if turns > 0 { top * runner.turn_retention } else { top };
    time += field::BASE_PATH_FT * f64::from(turns) / speed;

    if slide {
        time += slide_penalty(runner, speed);
    }
    Ok(time)
}

/// Time (s) to get back to `base` from the lead on a caught line drive.
pub fn time_to_return(runner: &RunnerProfile, base: Base) -> f64 {
    let lead = lead_off_ft(base) * runner.lead_factor;
    runner.reaction_s + run_time(lead, runner.sprint_speed_fps, runner.acceleration_fps2)
}

/// Ties go to the runner.
pub fn is_safe(runner_time_s: f64, ball_time_s: f64) -> bool {
    runner_time_s <= ball_time_s + br::CLOSE_PLAY_TOLERANCE
}
