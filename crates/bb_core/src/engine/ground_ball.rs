//! Ground balls: a simplified low-launch flight to the first bounce, then a
//! straight roll that decelerates to a stop.
//!
//! The roll path is what infielders intercept, so it exposes the ball
//! position over time in the field frame.

use serde::{Deserialize, Serialize};

use super::aerodynamics::BallAerodynamics;
use super::config::SimConfig;
use super::coordinates;
use super::environment::Environment;
use super::integrator::{integrate, stop_at_ground, State, TrajectoryResult};
use super::physics_constants::{ball, ground};
use crate::error::Result;
use crate::models::field::FieldPoint;

/// Share of exit velocity that survives into the low-launch flight.
///
/// Topped balls are hit on the top half and lose more of the bat's energy.
pub fn velocity_factor(launch_deg: f64) -> f64 {
    let la = launch_deg.clamp(-10.0, 10.0);
    if la <= 5.0 {
        0.60 + la / 5.0 * 0.1
    } else if la <= 8.0 {
        0.70 + (la - 5.0) / 3.0 * 0.1
    } else {
        0.80 + (la - 8.0) / 2.0 * 0.1
    }
}

/// Straight-line roll after the first bounce (field frame, ft, s).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundBallPath {
    /// First bounce
    pub bounce_point: FieldPoint,
    pub bounce_time_s: f64,
    /// Unit direction of the roll
    pub direction: (f64, f64),
    pub roll_speed_fps: f64,
    pub deceleration_fps2: f64,
}

impl GroundBallPath {
    fn roll_duration(&self) -> f64 {
        self.roll_speed_fps / self.deceleration_fps2
    }

    /// Time the ball stops rolling, measured from contact.
    pub fn stop_time(&self) -> f64 {
        self.bounce_time_s + self.roll_duration()
    }

    pub fn rest_point(&self) -> FieldPoint {
        self.position_at(self.stop_time())
    }

    /// Distance from home where the ball stops.
    pub fn total_distance_ft(&self) -> f64 {
        self.rest_point().distance_from_home()
    }

    pub fn speed_at(&self, t: f64) -> f64 {
        if t <= self.bounce_time_s {
            return self.roll_speed_fps;
        }
        (self.roll_speed_fps - self.deceleration_fps2 * (t - self.bounce_time_s)).max(0.0)
    }

    /// Ball position at time `t` after contact. Before the bounce the ball
    /// is placed on the straight line from home to the bounce point.
    pub fn position_at(&self, t: f64) -> FieldPoint {
        if t <= self.bounce_time_s {
            let f = if self.bounce_time_s > 0.0 { (t / self.bounce_time_s).max(0.0) } else { 1.0 };
            return FieldPoint::HOME.lerp(&self.bounce_point, f);
        }
        let tr = if t >= self.stop_time() { self.roll_duration() } else { t - self.bounce_time_s };
        let d = self.roll_speed_fps * tr - 0.5 * self.deceleration_fps2 * tr * tr;
        FieldPoint::new(
            self.bounce_point.x + self.direction.0 * d,
            self.bounce_point.y + self.direction.1 * d,
        )
    }

    /// First time the ball is at least `distance_ft` from home, if ever.
    pub fn time_at_distance(&self, distance_ft: f64) -> Option<f64> {
        let bounce_d = self.bounce_point.distance_from_home();
        if distance_ft <= bounce_d {
            return Some(self.bounce_time_s * (distance_ft / bounce_d.max(1e-9)).max(0.0));
        }
        let mut lo = self.bounce_time_s;
        let mut hi = self.stop_time();
        if self.position_at(hi).distance_from_home() < distance_ft {
            return None;
        }
        for _ in 0..50 {
            let mid = 0.5 * (lo + hi);
            if self.position_at(mid).distance_from_home() < distance_ft {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        Some(hi)
    }
}

/// Fly the skipping phase and build the roll path.
pub fn simulate_ground_ball(
    exit_velocity_mph: f64,
    launch_deg: f64,
    spray_deg: f64,
    env: &Environment,
    config: &SimConfig,
) -> Result<(TrajectoryResult, GroundBallPath)> {
    let speed = exit_velocity_mph * velocity_factor(launch_deg);
    let v0 = coordinates::launch_velocity(speed, launch_deg, spray_deg);
    let start = State::new(nalgebra::Vector3::new(0.0, 0.0, ball::CONTACT_HEIGHT_M), v0);
    let forces = BallAerodynamics::drag_only(env, ground::FLIGHT_CD);

    let flight = integrate(start, &forces, config, stop_at_ground)?;
    let s = &flight.summary;

    let bounce_point = coordinates::ground_point(&s.landing_position);
    let v_field = coordinates::to_field_ft(&s.landing_velocity);
    let horizontal = (v_field.x * v_field.x + v_field.y * v_field.y).sqrt();
    let direction = if horizontal > 1e-9 {
        (v_field.x / horizontal, v_field.y / horizontal)
    } else {
        let d = coordinates::to_field_ft(&coordinates::spray_direction(spray_deg));
        let n = d.norm().max(1e-9);
        (d.x / n, d.y / n)
    };

    let path = GroundBallPath {
        bounce_point,
        bounce_time_s: s.hang_time,
        direction,
        roll_speed_fps: horizontal * ground::BOUNCE_RETENTION,
        deceleration_fps2: ground::ROLL_DECELERATION,
    };
    Ok((flight, path))
}
