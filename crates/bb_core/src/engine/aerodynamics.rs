//! Aerodynamic Force Model
//!
//! Drag and Magnus on a spinning baseball.
//!
//! ```text
//!                 F_magnus  (v̂ × ŝ)
//!                    ↑
//!                    │
//!   F_drag ←──── ( ball ) ────→ v_rel = v − wind
//!                    │
//!                    ↓
//!                  m·g
//! ```
//!
//! - Drag: `½·Cd·ρ·A·v²` opposite to the air-relative velocity. `Cd` runs
//!   through the drag crisis (0.42 → 0.33 around 20 m/s) and rises with spin.
//! - Magnus: `½·Cl·ρ·A·v²` along `v̂ × ŝ`. `Cl` is linear in transverse
//!   spin up to 1500 rpm, then grows at a tenth of the slope.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use super::environment::Environment;
use super::integrator::{ForceModel, State};
use super::physics_constants::{aero, ball};
use crate::error::{Result, SimError};

/// Spin axis (unit, right-hand rule) and rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpinState {
    pub axis: Vector3<f64>,
    pub rpm: f64,
}

impl SpinState {
    pub fn none() -> Self {
        Self { axis: Vector3::zeros(), rpm: 0.0 }
    }

    pub fn new(axis: Vector3<f64>, rpm: f64) -> Self {
        let n = axis.norm();
        if n < 1e-12 || rpm.abs() < f64::EPSILON {
            return Self::none();
        }
        // Negative rpm flips the axis
        Self { axis: axis / n * rpm.signum(), rpm: rpm.abs() }
    }

    /// From an angular-velocity vector whose magnitude is rpm.
    pub fn from_vector(omega_rpm: &Vector3<f64>) -> Self {
        Self::new(*omega_rpm, omega_rpm.norm())
    }

    /// Component of the spin perpendicular to `v_hat`, in rpm.
    pub fn transverse_rpm(&self, v_hat: &Vector3<f64>) -> f64 {
        self.rpm * v_hat.cross(&self.axis).norm()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AeroForces {
    pub drag: Vector3<f64>,
    pub magnus: Vector3<f64>,
}

impl AeroForces {
    pub fn total(&self) -> Vector3<f64> {
        self.drag + self.magnus
    }
}

/// Speed-dependent base drag coefficient (drag crisis).
pub fn base_drag_coefficient(speed: f64) -> f64 {
    let transition = 1.0 + ((speed - aero::CD_TRANSITION_SPEED) / aero::CD_TRANSITION_WIDTH).exp();
    aero::CD_HIGH_SPEED + (aero::CD_LOW_SPEED - aero::CD_HIGH_SPEED) / transition
}

/// Full drag coefficient including spin and tilted-spin drag.
pub fn drag_coefficient(speed: f64, v_hat: &Vector3<f64>, spin: &SpinState) -> f64 {
    let mut cd = base_drag_coefficient(speed);
    cd += (aero::SPIN_DRAG_PER_RPM * spin.rpm).min(aero::SPIN_DRAG_MAX);

    if spin.rpm > aero::TILT_DRAG_MIN_RPM {
        let m = v_hat.cross(&spin.axis);
        let n = m.norm();
        if n > 1e-9 {
            let horizontal = (m.x * m.x + m.y * m.y).sqrt() / n;
            if horizontal > aero::TILT_DRAG_MIN_FRACTION {
                cd += aero::TILT_DRAG_PER_RPM * spin.rpm * horizontal;
            }
        }
    }
    cd
}

/// Lift coefficient from transverse spin.
pub fn lift_coefficient(transverse_rpm: f64) -> f64 {
    if transverse_rpm <= aero::CL_SATURATION_RPM {
        aero::CL_PER_RPM * transverse_rpm
    } else {
        let saturated = aero::CL_PER_RPM * aero::CL_SATURATION_RPM;
        saturated
            + aero::CL_PER_RPM
                * (transverse_rpm - aero::CL_SATURATION_RPM)
                * aero::CL_SATURATION_SLOPE_FACTOR
    }
}

/// Drag and Magnus forces (N) for an air-relative velocity (m/s).
pub fn forces(velocity_rel: &Vector3<f64>, spin: &SpinState, env: &Environment) -> Result<AeroForces> {
    if velocity_rel.iter().any(|c| !c.is_finite()) {
        return Err(SimError::NumericalDivergence { steps: 0, time_s: 0.0 });
    }
    if !spin.rpm.is_finite() || spin.rpm < 0.0 {
        return Err(SimError::config("spin_rpm", format!("invalid spin {}", spin.rpm)));
    }

    let speed = velocity_rel.norm();
    if speed < aero::MIN_SPEED {
        return Ok(AeroForces { drag: Vector3::zeros(), magnus: Vector3::zeros() });
    }
    let v_hat = velocity_rel / speed;
    let q = 0.5 * env.air_density() * ball::AREA * speed * speed;

    let drag = -v_hat * (q * drag_coefficient(speed, &v_hat, spin));

    let magnus = if spin.rpm < aero::MIN_SPIN_RPM {
        Vector3::zeros()
    } else {
        let dir = v_hat.cross(&spin.axis);
        let n = dir.norm();
        if n < 1e-9 {
            Vector3::zeros()
        } else {
            dir / n * (q * lift_coefficient(spin.rpm * n))
        }
    };

    Ok(AeroForces { drag, magnus })
}

/// Constant-spin ball in a given environment.
///
/// Spin decay over a single flight is small and ignored.
#[derive(Debug, Clone)]
pub struct BallAerodynamics<'a> {
    env: &'a Environment,
    spin: SpinState,
    wind: Vector3<f64>,
    drag_override: Option<f64>,
}

impl<'a> BallAerodynamics<'a> {
    pub fn new(env: &'a Environment, spin: SpinState) -> Self {
        Self { env, spin, wind: env.wind_trajectory_ms(), drag_override: None }
    }

    /// Fixed-Cd drag with no Magnus force.
    pub fn drag_only(env: &'a Environment, cd: f64) -> Self {
        Self {
            env,
            spin: SpinState::none(),
            wind: env.wind_trajectory_ms(),
            drag_override: Some(cd),
        }
    }
}

impl ForceModel for BallAerodynamics<'_> {
    fn force(&self, state: &State) -> Result<Vector3<f64>> {
        let v_rel = state.velocity - self.wind;
        if v_rel.iter().any(|c| !c.is_finite()) {
            return Err(SimError::NumericalDivergence { steps: 0, time_s: 0.0 });
        }
        match self.drag_override {
            Some(cd) => {
                let speed = v_rel.norm();
                Ok(-v_rel * (0.5 * self.env.air_density() * ball::AREA * cd * speed))
            }
            None => Ok(forces(&v_rel, &self.spin, self.env)?.total()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backspin(rpm: f64) -> SpinState {
        SpinState::new(Vector3::y(), rpm)
    }

    #[test]
    fn test_drag_crisis_is_monotone() {
        let mut prev = base_drag_coefficient(0.0);
        for v in 1..60 {
            let cd = base_drag_coefficient(v as f64);
            assert!(cd < prev);
            prev = cd;
        }
        assert!(base_drag_coefficient(0.0) < 0.42 && base_drag_coefficient(0.0) > 0.41);
        assert!(base_drag_coefficient(45.0) < 0.332);
    }

    #[test]
    fn test_drag_opposes_velocity() {
        let env = Environment::standard();
        let v = Vector3::new(40.0, 5.0, 10.0);
        let f = forces(&v, &SpinState::none(), &env).unwrap();
        assert!(f.drag.dot(&v) < 0.0);
        assert!(f.drag.normalize().dot(&v.normalize()) < -0.999_999);
        assert_eq!(f.magnus, Vector3::zeros());
    }

    #[test]
    fn test_backspin_lifts() {
        let env = Environment::standard();
        let f = forces(&Vector3::new(40.0, 0.0, 0.0), &backspin(1800.0), &env).unwrap();
        assert!(f.magnus.z > 0.0);
        assert!(f.magnus.x.abs() < 1e-12 && f.magnus.y.abs() < 1e-12);
    }

    #[test]
    fn test_sidespin_curves_toward_right_field() {
        let env = Environment::standard();
        let side = SpinState::new(Vector3::z(), 1500.0);
        let f = forces(&Vector3::new(40.0, 0.0, 0.0), &side, &env).unwrap();
        // Trajectory −y is right field
        assert!(f.magnus.y < 0.0);
    }

    #[test]
    fn test_gyro_spin_has_no_magnus() {
        let env = Environment::standard();
        let gyro = SpinState::new(Vector3::x(), 2000.0);
        let f = forces(&Vector3::new(40.0, 0.0, 0.0), &gyro, &env).unwrap();
        assert!(f.magnus.norm() < 1e-12);
    }

    #[test]
    fn test_zero_speed_and_spin_edges() {
        let env = Environment::standard();
        let f = forces(&Vector3::zeros(), &backspin(2000.0), &env).unwrap();
        assert_eq!(f.total(), Vector3::zeros());

        let f = forces(&Vector3::new(30.0, 0.0, 0.0), &backspin(0.5), &env).unwrap();
        assert_eq!(f.magnus, Vector3::zeros());
    }

    #[test]
    fn test_lift_saturates() {
        let below = lift_coefficient(1500.0);
        assert!((below - 0.345).abs() < 1e-9);
        assert!((lift_coefficient(750.0) - below / 2.0).abs() < 1e-9);
        let slope_above = lift_coefficient(2500.0) - below;
        assert!((slope_above - 0.00023 * 1000.0 * 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_sidespin_adds_drag() {
        let v_hat = Vector3::x();
        let back = drag_coefficient(40.0, &v_hat, &backspin(1500.0));
        let tilted = drag_coefficient(
            40.0,
            &v_hat,
            &SpinState::new(Vector3::new(0.0, 1.0, 1.0), 1500.0 * 2f64.sqrt()),
        );
        assert!(tilted > back);
    }

    #[test]
    fn test_thinner_air_weaker_forces() {
        let v = Vector3::new(40.0, 0.0, 5.0);
        let sea = forces(&v, &backspin(2000.0), &Environment::standard()).unwrap();
        let coors = forces(&v, &backspin(2000.0), &Environment::coors_field()).unwrap();
        assert!(coors.drag.norm() < sea.drag.norm());
        assert!(coors.magnus.norm() < sea.magnus.norm());
    }

    #[test]
    fn test_non_finite_velocity_rejected() {
        let env = Environment::standard();
        let r = forces(&Vector3::new(f64::NAN, 0.0, 0.0), &SpinState::none(), &env);
        assert!(matches!(r, Err(SimError::NumericalDivergence { .. })));
        let state = State { position: Vector3::zeros(), velocity: Vector3::new(f64::INFINITY, 0.0, 0.0) };
        let r = BallAerodynamics::new(&env, backspin(1800.0)).force(&state);
        assert!(matches!(r, Err(SimError::NumericalDivergence { .. })));
    }

    #[test]
    fn test_headwind_increases_drag() {
        let calm = Environment::standard();
        let windy = Environment::standard()
            .with_wind(Vector3::new(0.0, -15.0, 0.0))
            .unwrap();
        let state = State { position: Vector3::zeros(), velocity: Vector3::new(40.0, 0.0, 0.0) };
        let f_calm = BallAerodynamics::new(&calm, SpinState::none()).force(&state).unwrap();
        let f_wind = BallAerodynamics::new(&windy, SpinState::none()).force(&state).unwrap();
        assert!(f_wind.x < f_calm.x);
    }
}
