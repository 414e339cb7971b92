//! Batted-Ball Trajectory Simulator
//!
//! Contact is at 3 ft above the plate. Balls launched at 10° or more fly
//! under the full drag + Magnus model until they reach the ground; lower
//! launches use the ground-ball model.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::aerodynamics::BallAerodynamics;
use super::collision::ContactEvent;
use super::config::SimConfig;
use super::coordinates;
use super::environment::Environment;
use super::ground_ball::{self, GroundBallPath};
use super::integrator::{integrate, stop_at_ground, State, TrajectoryResult};
use super::physics_constants::{ball, field};
use crate::error::{ensure_finite, Result, SimError};
use crate::models::field::{fence_distance_ft, is_fair_spray, FieldPoint};
use crate::models::spin::SpinVector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattedBallType {
    GroundBall,
    LineDrive,
    FlyBall,
    PopUp,
}

impl BattedBallType {
    pub fn from_launch_angle(launch_deg: f64) -> Self {
        if launch_deg < 10.0 {
            BattedBallType::GroundBall
        } else if launch_deg < 25.0 {
            BattedBallType::LineDrive
        } else if launch_deg <= 50.0 {
            BattedBallType::FlyBall
        } else {
            BattedBallType::PopUp
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattedBall {
    pub ball_type: BattedBallType,
    pub exit_velocity_mph: f64,
    pub launch_angle_deg: f64,
    pub spray_angle_deg: f64,
    /// Flight to the first ground contact
    pub trajectory: TrajectoryResult,
    pub landing_point: FieldPoint,
    /// Spray angle of the landing point (sidespin can move it)
    pub landing_spray_deg: f64,
    pub distance_ft: f64,
    pub hang_time_s: f64,
    pub peak_height_ft: f64,
    /// Roll after the first bounce, for ground balls
    pub ground_path: Option<GroundBallPath>,
}

impl BattedBall {
    pub fn is_fair(&self) -> bool {
        is_fair_spray(self.landing_spray_deg)
    }

    /// Fair, past the fence at its spray angle, and high enough to clear it.
    pub fn clears_fence(&self) -> bool {
        self.is_fair()
            && self.ground_path.is_none()
            && self.distance_ft >= fence_distance_ft(self.landing_spray_deg)
            && self.peak_height_ft >= field::HOME_RUN_MIN_PEAK_FT
    }

    /// Ball position in the field frame (ft) at time `t`, airborne phase
    /// interpolated from the samples when available.
    pub fn ground_position_at(&self, t: f64) -> FieldPoint {
        if let Some(path) = &self.ground_path {
            return path.position_at(t);
        }
        let samples = &self.trajectory.samples;
        if t >= self.hang_time_s || samples.len() < 2 {
            return self.landing_point;
        }
        let i = samples.partition_point(|s| s.time <= t).clamp(1, samples.len() - 1);
        let (a, b) = (&samples[i - 1], &samples[i]);
        let span = (b.time - a.time).max(1e-12);
        let f = ((t - a.time) / span).clamp(0.0, 1.0);
        let p = a.state.position + (b.state.position - a.state.position) * f;
        coordinates::ground_point(&p)
    }
}

/// Integrate a batted ball from contact to the ground.
pub fn simulate_trajectory(
    exit_velocity_mph: f64,
    launch_deg: f64,
    spray_deg: f64,
    spin: &SpinVector,
    env: &Environment,
    config: &SimConfig,
) -> Result<TrajectoryResult> {
    ensure_finite("exit_velocity_mph", exit_velocity_mph)?;
    ensure_finite("launch_angle_deg", launch_deg)?;
    ensure_finite("spray_angle_deg", spray_deg)?;
    if exit_velocity_mph < 0.0 {
        return Err(SimError::config("exit_velocity_mph", "must be non-negative"));
    }

    let v0 = coordinates::launch_velocity(exit_velocity_mph, launch_deg, spray_deg);
    let spin_state = spin.axis_for(&v0);
    let forces = BallAerodynamics::new(env, spin_state);
    let start = State::new(Vector3::new(0.0, 0.0, ball::CONTACT_HEIGHT_M), v0);
    integrate(start, &forces, config, stop_at_ground)
}

/// Simulate the ball off the bat for a resolved contact.
pub fn simulate_batted_ball(contact: &ContactEvent, env: &Environment, config: &SimConfig) -> Result<BattedBall> {
    let ball_type = BattedBallType::from_launch_angle(contact.launch_angle_deg);
    let (trajectory, ground_path) = if ball_type == BattedBallType::GroundBall {
        let (flight, path) = ground_ball::simulate_ground_ball(
            contact.exit_velocity_mph,
            contact.launch_angle_deg,
            contact.spray_angle_deg,
            env,
            config,
        )?;
        (flight, Some(path))
    } else {
        let flight = simulate_trajectory(
            contact.exit_velocity_mph,
            contact.launch_angle_deg,
            contact.spray_angle_deg,
            &contact.spin,
            env,
            config,
        )?;
        (flight, None)
    };

    let s = &trajectory.summary;
    let landing_point = coordinates::ground_point(&s.landing_position);
    let ball = BattedBall {
        ball_type,
        exit_velocity_mph: contact.exit_velocity_mph,
        launch_angle_deg: contact.launch_angle_deg,
        spray_angle_deg: contact.spray_angle_deg,
        landing_spray_deg: coordinates::spray_angle_deg(&landing_point),
        landing_point,
        distance_ft: s.distance_ft(),
        hang_time_s: s.hang_time,
        peak_height_ft: s.peak_height_ft(),
        ground_path,
        trajectory,
    };

    if config.debug_enabled() {
        debug!(
            ev = ball.exit_velocity_mph,
            la = ball.launch_angle_deg,
            distance_ft = ball.distance_ft,
            hang = ball.hang_time_s,
            ball_type = ?ball.ball_type,
            "batted ball simulated"
        );
    }
    Ok(ball)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::collision::ContactQuality;

    fn carry(ev: f64, la: f64, spin: SpinVector, env: &Environment, cfg: &SimConfig) -> f64 {
        simulate_trajectory(ev, la, 0.0, &spin, env, cfg).unwrap().summary.distance_ft()
    }

    fn reference(env: &Environment) -> f64 {
        carry(100.0, 28.0, SpinVector::backspin(1800.0), env, &SimConfig::default())
    }

    fn contact(ev: f64, la: f64, spray: f64, spin: SpinVector) -> ContactEvent {
        ContactEvent {
            exit_velocity_mph: ev,
            launch_angle_deg: la,
            spray_angle_deg: spray,
            spin,
            collision_efficiency: 0.2,
            sweet_spot_offset_in: 0.0,
            quality: ContactQuality::Barrel,
        }
    }

    #[test]
    fn test_reference_distance() {
        let d = reference(&Environment::standard());
        assert!((d - 395.0).abs() <= 395.0 * 0.03, "distance {d}");
    }

    #[test]
    fn test_reference_flight_shape() {
        let r = simulate_trajectory(100.0, 28.0, 0.0, &SpinVector::backspin(1800.0), &Environment::standard(), &SimConfig::default()).unwrap();
        assert!((4.8..6.0).contains(&r.summary.hang_time));
        assert!((75.0..110.0).contains(&r.summary.peak_height_ft()));
        assert!(r.summary.time_to_peak < r.summary.hang_time / 2.0 + 0.5);
    }

    #[test]
    fn test_altitude_adds_distance() {
        let gain = reference(&Environment::coors_field()) - reference(&Environment::standard());
        assert!((20.0..=45.0).contains(&gain), "coors gain {gain}");
    }

    #[test]
    fn test_backspin_adds_carry() {
        let env = Environment::standard();
        let cfg = SimConfig::default();
        let none = carry(100.0, 28.0, SpinVector::default(), &env, &cfg);
        let back = carry(100.0, 28.0, SpinVector::backspin(1500.0), &env, &cfg);
        let gain = back - none;
        assert!((50.0..=70.0).contains(&gain), "gain {gain}");
    }

    #[test]
    fn test_sidespin_costs_distance_and_curves() {
        let env = Environment::standard();
        let cfg = SimConfig::default();
        let back = simulate_trajectory(100.0, 28.0, 0.0, &SpinVector::backspin(1500.0), &env, &cfg).unwrap();
        let tilted = simulate_trajectory(100.0, 28.0, 0.0, &SpinVector::new(1500.0, 1500.0, 0.0), &env, &cfg).unwrap();
        assert!(tilted.summary.distance_ft() < back.summary.distance_ft());
        // Positive sidespin drifts toward right field (trajectory −y)
        assert!(tilted.summary.landing_position.y < -5.0);
    }

    #[test]
    fn test_step_size_error_budget() {
        let env = Environment::standard();
        let fine = reference(&env);
        let mut coarse_cfg = SimConfig::default();
        coarse_cfg.integration.dt = 0.002;
        let coarse = carry(100.0, 28.0, SpinVector::backspin(1800.0), &env, &coarse_cfg);
        assert!((coarse - fine).abs() / fine < 0.01);
    }

    #[test]
    fn test_tailwind_carries_farther() {
        let calm = reference(&Environment::standard());
        let out = Environment::standard().with_wind(Vector3::new(0.0, 10.0, 0.0)).unwrap();
        assert!(reference(&out) > calm + 15.0);
    }

    #[test]
    fn test_ball_type_boundaries() {
        assert_eq!(BattedBallType::from_launch_angle(-5.0), BattedBallType::GroundBall);
        assert_eq!(BattedBallType::from_launch_angle(9.99), BattedBallType::GroundBall);
        assert_eq!(BattedBallType::from_launch_angle(10.0), BattedBallType::LineDrive);
        assert_eq!(BattedBallType::from_launch_angle(25.0), BattedBallType::FlyBall);
        assert_eq!(BattedBallType::from_launch_angle(50.0), BattedBallType::FlyBall);
        assert_eq!(BattedBallType::from_launch_angle(55.0), BattedBallType::PopUp);
    }

    #[test]
    fn test_low_launch_uses_ground_model() {
        let ball = simulate_batted_ball(&contact(95.0, 5.0, 0.0, SpinVector::default()), &Environment::standard(), &SimConfig::default()).unwrap();
        assert_eq!(ball.ball_type, BattedBallType::GroundBall);
        assert!(ball.ground_path.is_some());
        assert!(!ball.clears_fence());
    }

    #[test]
    fn test_no_doubter_clears_fence() {
        let ball = simulate_batted_ball(&contact(108.0, 30.0, 20.0, SpinVector::backspin(2200.0)), &Environment::standard(), &SimConfig::default()).unwrap();
        assert!(ball.is_fair());
        assert!(ball.clears_fence(), "distance {}", ball.distance_ft);
    }

    #[test]
    fn test_ground_position_interpolates_flight() {
        let ball = simulate_batted_ball(&contact(100.0, 28.0, 0.0, SpinVector::backspin(1800.0)), &Environment::standard(), &SimConfig::default()).unwrap();
        let mid = ball.ground_position_at(ball.hang_time_s / 2.0);
        assert!(mid.y > 100.0 && mid.y < ball.landing_point.y);
        assert_eq!(ball.ground_position_at(ball.hang_time_s + 1.0), ball.landing_point);
    }

    #[test]
    fn test_negative_exit_velocity_rejected() {
        let r = simulate_trajectory(-1.0, 20.0, 0.0, &SpinVector::default(), &Environment::standard(), &SimConfig::default());
        assert!(matches!(r, Err(SimError::Configuration { .. })));
    }
}
