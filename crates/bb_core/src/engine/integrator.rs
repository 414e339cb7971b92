//! Trajectory Integrator
//!
//! Fixed-step classical RK4 over position and velocity. The force model is a
//! trait so the same integrator drives pitches, batted balls and the
//! simplified ground-ball flight.
//!
//! Every run has a step budget (`max_time / dt`). Exhausting it, or producing
//! a non-finite state, is a `NumericalDivergence` error; there is no retry.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use super::config::{SampleRetention, SimConfig};
use super::physics_constants::ball;
use crate::error::{Result, SimError};

/// Kinematic state in the trajectory frame (m, m/s).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
}

impl State {
    pub fn new(position: Vector3<f64>, velocity: Vector3<f64>) -> Self {
        Self { position, velocity }
    }

    fn is_finite(&self) -> bool {
        self.position.iter().chain(self.velocity.iter()).all(|c| c.is_finite())
    }

    fn lerp(&self, other: &State, f: f64) -> State {
        State {
            position: self.position + (other.position - self.position) * f,
            velocity: self.velocity + (other.velocity - self.velocity) * f,
        }
    }
}

/// Non-gravitational force (N) on the ball.
pub trait ForceModel {
    fn force(&self, state: &State) -> Result<Vector3<f64>>;
}

impl<F> ForceModel for F
where
    F: Fn(&State) -> Result<Vector3<f64>>,
{
    fn force(&self, state: &State) -> Result<Vector3<f64>> {
        self(state)
    }
}

/// Gravity only.
pub struct NoForces;

impl ForceModel for NoForces {
    fn force(&self, _state: &State) -> Result<Vector3<f64>> {
        Ok(Vector3::zeros())
    }
}

/// Which plane the stop condition crossed, used to interpolate the final
/// sample onto it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Crossing {
    /// z = 0
    Ground,
    /// x = 0 (front of home plate)
    Plate,
    /// Custom stop, no interpolation
    Step,
}

/// Stop on ground contact.
pub fn stop_at_ground(state: &State) -> Option<Crossing> {
    (state.position.z <= 0.0).then_some(Crossing::Ground)
}

/// Stop at the plate plane, or earlier if the ball hits the ground.
pub fn stop_at_plate_or_ground(state: &State) -> Option<Crossing> {
    if state.position.x <= 0.0 {
        Some(Crossing::Plate)
    } else if state.position.z <= 0.0 {
        Some(Crossing::Ground)
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    pub time: f64,
    pub state: State,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySummary {
    pub landing_position: Vector3<f64>,
    pub landing_velocity: Vector3<f64>,
    /// Time of the terminal sample (s)
    pub hang_time: f64,
    pub peak_height: f64,
    pub time_to_peak: f64,
    /// Ground distance from home plate to the terminal point (m)
    pub horizontal_distance: f64,
    pub steps: usize,
    pub termination: Crossing,
}

impl TrajectorySummary {
    pub fn distance_ft(&self) -> f64 {
        self.horizontal_distance * super::physics_constants::units::M_TO_FT
    }

    pub fn peak_height_ft(&self) -> f64 {
        self.peak_height * super::physics_constants::units::M_TO_FT
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryResult {
    pub samples: Vec<TrajectorySample>,
    pub summary: TrajectorySummary,
}

fn acceleration<F: ForceModel>(force: &F, state: &State) -> Result<Vector3<f64>> {
    Ok(Vector3::new(0.0, 0.0, -ball::GRAVITY) + force.force(state)? / ball::MASS)
}

/// One RK4 step.
pub fn rk4_step<F: ForceModel>(state: &State, force: &F, dt: f64) -> Result<State> {
    let k1_v = acceleration(force, state)?;
    let k1_x = state.velocity;

    let s2 = State::new(state.position + k1_x * (dt / 2.0), state.velocity + k1_v * (dt / 2.0));
    let k2_v = acceleration(force, &s2)?;
    let k2_x = s2.velocity;

    let s3 = State::new(state.position + k2_x * (dt / 2.0), state.velocity + k2_v * (dt / 2.0));
    let k3_v = acceleration(force, &s3)?;
    let k3_x = s3.velocity;

    let s4 = State::new(state.position + k3_x * dt, state.velocity + k3_v * dt);
    let k4_v = acceleration(force, &s4)?;
    let k4_x = s4.velocity;

    Ok(State::new(
        state.position + (k1_x + k2_x * 2.0 + k3_x * 2.0 + k4_x) * (dt / 6.0),
        state.velocity + (k1_v + k2_v * 2.0 + k3_v * 2.0 + k4_v) * (dt / 6.0),
    ))
}

/// Integrate until `stop` fires.
///
/// The terminal sample is interpolated linearly onto the crossed plane.
pub fn integrate<F, S>(initial: State, force: &F, config: &SimConfig, mut stop: S) -> Result<TrajectoryResult>
where
    F: ForceModel,
    S: FnMut(&State) -> Option<Crossing>,
{
    config.validate()?;
    let dt = config.dt();
    let budget = config.integration.step_budget();
    let keep = config.integration.retention == SampleRetention::Full;
    let debug = config.debug_enabled();

    if !initial.is_finite() {
        return Err(SimError::config("initial_state", "non-finite initial state"));
    }

    let mut samples = Vec::new();
    if keep {
        samples.reserve(budget.min(8192));
        samples.push(TrajectorySample { time: 0.0, state: initial });
    }

    let mut state = initial;
    let mut time = 0.0;
    let mut peak = (initial.position.z, 0.0);

    for step in 1..=budget {
        let next = match rk4_step(&state, force, dt) {
            Ok(s) if s.is_finite() => s,
            Ok(_) | Err(SimError::NumericalDivergence { .. }) => {
                if debug {
                    warn!(step, time, "integrator produced a non-finite state");
                }
                return Err(SimError::NumericalDivergence { steps: step, time_s: time });
            }
            Err(e) => return Err(e),
        };
        let next_time = time + dt;

        if let Some(crossing) = stop(&next) {
            let f = match crossing {
                Crossing::Ground => crossing_fraction(state.position.z, next.position.z),
                Crossing::Plate => crossing_fraction(state.position.x, next.position.x),
                Crossing::Step => 1.0,
            };
            let terminal = state.lerp(&next, f);
            let t_end = time + dt * f;
            if terminal.position.z > peak.0 {
                peak = (terminal.position.z, t_end);
            }
            if keep {
                samples.push(TrajectorySample { time: t_end, state: terminal });
            }
            if debug {
                trace!(steps = step, t_end, ?crossing, "trajectory terminated");
            }
            let summary = TrajectorySummary {
                landing_position: terminal.position,
                landing_velocity: terminal.velocity,
                hang_time: t_end,
                peak_height: peak.0,
                time_to_peak: peak.1,
                horizontal_distance: terminal.position.xy().norm(),
                steps: step,
                termination: crossing,
            };
            return Ok(TrajectoryResult { samples, summary });
        }

        state = next;
        time = next_time;
        if state.position.z > peak.0 {
            peak = (state.position.z, time);
        }
        if keep {
            samples.push(TrajectorySample { time, state });
        }
    }

    if debug {
        warn!(budget, time, "integrator exhausted its step budget");
    }
    Err(SimError::NumericalDivergence { steps: budget, time_s: time })
}

/// Fraction of the step at which a coordinate crosses zero.
fn crossing_fraction(before: f64, after: f64) -> f64 {
    let span = before - after;
    if span.abs() < 1e-15 {
        1.0
    } else {
        (before / span).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vacuum_launch(speed: f64, angle_deg: f64) -> State {
        let a = angle_deg.to_radians();
        State::new(Vector3::zeros(), Vector3::new(speed * a.cos(), 0.0, speed * a.sin()))
    }

    #[test]
    fn test_vacuum_range_matches_closed_form() {
        let initial = vacuum_launch(30.0, 45.0);
        let result = integrate(initial, &NoForces, &SimConfig::default(), stop_at_ground).unwrap();
        let expected = 30.0 * 30.0 / ball::GRAVITY;
        assert!((result.summary.horizontal_distance - expected).abs() < 1e-3);
        let expected_peak = (30.0 * 45f64.to_radians().sin()).powi(2) / (2.0 * ball::GRAVITY);
        assert!((result.summary.peak_height - expected_peak).abs() < 1e-3);
        assert!((result.summary.time_to_peak * 2.0 - result.summary.hang_time).abs() < 2e-3);
        assert_eq!(result.summary.termination, Crossing::Ground);
    }

    #[test]
    fn test_terminal_sample_is_on_ground() {
        let result = integrate(vacuum_launch(20.0, 30.0), &NoForces, &SimConfig::default(), stop_at_ground).unwrap();
        let last = result.samples.last().unwrap();
        assert!(last.state.position.z.abs() < 1e-9);
        assert_eq!(result.summary.landing_position, last.state.position);
    }

    #[test]
    fn test_summary_only_retention() {
        let result =
            integrate(vacuum_launch(20.0, 30.0), &NoForces, &SimConfig::fast(), stop_at_ground).unwrap();
        assert!(result.samples.is_empty());
        assert!(result.summary.steps > 0);
    }

    #[test]
    fn test_closure_force_model() {
        let headwind = |_: &State| -> Result<Vector3<f64>> { Ok(Vector3::new(-0.2, 0.0, 0.0)) };
        let calm = integrate(vacuum_launch(30.0, 45.0), &NoForces, &SimConfig::default(), stop_at_ground).unwrap();
        let windy = integrate(vacuum_launch(30.0, 45.0), &headwind, &SimConfig::default(), stop_at_ground).unwrap();
        assert!(windy.summary.horizontal_distance < calm.summary.horizontal_distance);
    }

    #[test]
    fn test_budget_exhaustion_is_divergence() {
        // Straight up at 100 m/s takes ~20 s to come down
        let initial = State::new(Vector3::zeros(), Vector3::new(0.0, 0.0, 100.0));
        let err = integrate(initial, &NoForces, &SimConfig::default(), stop_at_ground).unwrap_err();
        assert!(matches!(err, SimError::NumericalDivergence { steps: 10_000, .. }));
    }

    #[test]
    fn test_non_finite_force_is_divergence() {
        let blowup = |s: &State| -> Result<Vector3<f64>> {
            Ok(Vector3::new(0.0, 0.0, if s.position.z > 1.0 { f64::INFINITY } else { 0.0 }))
        };
        let err = integrate(vacuum_launch(30.0, 80.0), &blowup, &SimConfig::default(), stop_at_ground).unwrap_err();
        assert!(matches!(err, SimError::NumericalDivergence { .. }));
    }

    #[test]
    fn test_plate_crossing_interpolates_x() {
        let initial = State::new(Vector3::new(16.0, 0.0, 1.8), Vector3::new(-40.0, 0.0, 0.0));
        let result = integrate(initial, &NoForces, &SimConfig::default(), stop_at_plate_or_ground).unwrap();
        assert_eq!(result.summary.termination, Crossing::Plate);
        assert!(result.summary.landing_position.x.abs() < 1e-9);
        assert!((result.summary.hang_time - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut cfg = SimConfig::default();
        cfg.integration.dt = -0.001;
        let err = integrate(vacuum_launch(10.0, 10.0), &NoForces, &cfg, stop_at_ground).unwrap_err();
        assert!(matches!(err, SimError::Configuration { .. }));
    }
}
