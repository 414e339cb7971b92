//! Fielder Movement & Catch Model
//!
//! Movement time = reaction + acceleration + cruise, over the route-adjusted
//! distance, at a cruise speed penalised by the direction of travel relative
//! to facing home plate. The catch model turns the time margin between the
//! ball and the fielder into a probability.

use serde::{Deserialize, Serialize};

use super::ground_ball::GroundBallPath;
use super::physics_constants::{catch, fielding};
use crate::models::attributes::FielderProfile;
use crate::models::field::FieldPoint;
use crate::models::fielder::Fielder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveDirection {
    Forward,
    Lateral,
    Backward,
}

impl MoveDirection {
    /// Classify a run from `from` to `to`. Forward is toward home plate.
    pub fn between(from: &FieldPoint, to: &FieldPoint) -> Self {
        let (mx, my) = (to.x - from.x, to.y - from.y);
        let (fx, fy) = (-from.x, -from.y);
        let m = (mx * mx + my * my).sqrt();
        let f = (fx * fx + fy * fy).sqrt();
        if m < 1e-9 || f < 1e-9 {
            return MoveDirection::Forward;
        }
        let cos = ((mx * fx + my * fy) / (m * f)).clamp(-1.0, 1.0);
        let angle = cos.acos().to_degrees();
        if angle <= fielding::FORWARD_MAX_DEG {
            MoveDirection::Forward
        } else if angle <= fielding::LATERAL_MAX_DEG {
            MoveDirection::Lateral
        } else {
            MoveDirection::Backward
        }
    }

    pub fn speed_factor(self) -> f64 {
        match self {
            MoveDirection::Forward => fielding::FORWARD_SPEED_FACTOR,
            MoveDirection::Lateral => fielding::LATERAL_SPEED_FACTOR,
            MoveDirection::Backward => fielding::BACKWARD_SPEED_FACTOR,
        }
    }
}

/// Time (s) to cover `distance_ft` from a standstill: accelerate to
/// `cruise_fps`, then hold it.
pub fn run_time(distance_ft: f64, cruise_fps: f64, acceleration_fps2: f64) -> f64 {
    if distance_ft <= 0.0 {
        return 0.0;
    }
    let accel_distance = cruise_fps * cruise_fps / (2.0 * acceleration_fps2);
    if distance_ft <= accel_distance {
        (2.0 * distance_ft / acceleration_fps2).sqrt()
    } else {
        cruise_fps / acceleration_fps2 + (distance_ft - accel_distance) / cruise_fps
    }
}

/// Reaction plus movement time for a fielder profile between two points.
pub fn movement_time(profile: &FielderProfile, from: &FieldPoint, to: &FieldPoint) -> f64 {
    let direction = MoveDirection::between(from, to);
    let distance = from.distance_to(to) / profile.route_efficiency;
    let cruise = profile.top_speed_fps * direction.speed_factor() * fielding::CRUISE_FRACTION;
    profile.reaction_s + run_time(distance, cruise, profile.acceleration_fps2)
}

/// Time for `fielder` to get from where they stand to `target`.
pub fn time_to_reach(fielder: &Fielder, target: &FieldPoint) -> f64 {
    movement_time(&fielder.profile(), &fielder.location, target)
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Probability of securing the ball.
///
/// `margin_s` is ball arrival minus fielder arrival; positive means the
/// fielder is waiting. `distance_ft` is how far the fielder ran.
pub fn catch_probability(margin_s: f64, direction: MoveDirection, distance_ft: f64, sure_hands_s: f64) -> f64 {
    let mut shift = -sure_hands_s;
    if direction == MoveDirection::Backward {
        shift += catch::BACKWARD_SHIFT;
    }
    shift += ((distance_ft - catch::DISTANCE_THRESHOLD_FT).max(0.0) * catch::DISTANCE_SHIFT_PER_FT)
        .min(catch::DISTANCE_SHIFT_MAX);
    sigmoid((margin_s - shift) / catch::MARGIN_SCALE)
}

/// A fielder's best attempt at a ball.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Intercept {
    pub point: FieldPoint,
    /// When the ball gets to `point` (s after contact)
    pub ball_time_s: f64,
    /// When the fielder gets to `point`
    pub fielder_time_s: f64,
    pub direction: MoveDirection,
    pub distance_ft: f64,
    pub probability: f64,
}

impl Intercept {
    pub fn margin_s(&self) -> f64 {
        self.ball_time_s - self.fielder_time_s
    }

    /// When the ball is in the fielder's glove.
    pub fn secured_time_s(&self) -> f64 {
        self.ball_time_s.max(self.fielder_time_s)
    }
}

/// Attempt on a ball that comes down at `point` at `ball_time_s`.
pub fn air_ball_attempt(fielder: &Fielder, point: &FieldPoint, ball_time_s: f64) -> Intercept {
    let profile = fielder.profile();
    let direction = MoveDirection::between(&fielder.location, point);
    let distance = fielder.location.distance_to(point);
    let fielder_time = movement_time(&profile, &fielder.location, point);
    Intercept {
        point: *point,
        ball_time_s,
        fielder_time_s: fielder_time,
        direction,
        distance_ft: distance,
        probability: catch_probability(ball_time_s - fielder_time, direction, distance, profile.sure_hands_s),
    }
}

/// Best place along a grounder's path for `fielder` to field it.
///
/// Samples the path every 50 ms up to the moment it stops, plus the rest
/// point, where a fielder has all the time they need.
pub fn ground_ball_intercept(fielder: &Fielder, path: &GroundBallPath) -> Intercept {
    let stop = path.stop_time();
    let mut best: Option<Intercept> = None;
    let mut t = fielding::INTERCEPT_SAMPLE_DT;
    while t < stop {
        let attempt = air_ball_attempt(fielder, &path.position_at(t), t);
        if best.map_or(true, |b| attempt.probability > b.probability) {
            best = Some(attempt);
        }
        t += fielding::INTERCEPT_SAMPLE_DT;
    }

    let rest = path.rest_point();
    let mut at_rest = air_ball_attempt(fielder, &rest, stop);
    if at_rest.fielder_time_s >= stop {
        at_rest.ball_time_s = at_rest.fielder_time_s;
        at_rest.probability = catch_probability(
            catch::RESTING_BALL_MARGIN,
            at_rest.direction,
            at_rest.distance_ft,
            fielder.profile().sure_hands_s,
        );
    }
    match best {
        Some(b) if b.probability >= at_rest.probability => b,
        _ => at_rest,
    }
}

/// Where and when a fielder can first get their hands on a rolling ball,
/// chasing it down if it is past them.
pub fn chase_down(fielder: &Fielder, path: &GroundBallPath) -> (FieldPoint, f64) {
    let profile = fielder.profile();
    let stop = path.stop_time();
    let mut t = 0.0;
    while t < stop {
        let p = path.position_at(t);
        if movement_time(&profile, &fielder.location, &p) <= t {
            return (p, t);
        }
        t += fielding::INTERCEPT_SAMPLE_DT;
    }
    let rest = path.rest_point();
    (rest, movement_time(&profile, &fielder.location, &rest).max(stop))
}
