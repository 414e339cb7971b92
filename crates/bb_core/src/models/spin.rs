//! Named spin components relative to the direction of flight.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Spin decomposed by effect, in rpm.
///
/// - `backspin_rpm`: about the horizontal axis perpendicular to flight; + lifts
/// - `sidespin_rpm`: about the vertical axis; + curves toward right field
/// - `gyro_rpm`: about the flight direction; no Magnus force
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SpinVector {
    pub backspin_rpm: f64,
    pub sidespin_rpm: f64,
    pub gyro_rpm: f64,
}

impl SpinVector {
    pub fn new(backspin_rpm: f64, sidespin_rpm: f64, gyro_rpm: f64) -> Self {
        Self { backspin_rpm, sidespin_rpm, gyro_rpm }
    }

    pub fn backspin(rpm: f64) -> Self {
        Self::new(rpm, 0.0, 0.0)
    }

    pub fn total_rpm(&self) -> f64 {
        (self.backspin_rpm.powi(2) + self.sidespin_rpm.powi(2) + self.gyro_rpm.powi(2)).sqrt()
    }

    /// Angular velocity in the trajectory frame (rpm along the axis) for a
    /// ball travelling along `direction`.
    pub fn to_trajectory_vector(&self, direction: &Vector3<f64>) -> Vector3<f64> {
        let horizontal = Vector3::new(direction.x, direction.y, 0.0);
        let h = if horizontal.norm() > 1e-9 {
            horizontal.normalize()
        } else {
            Vector3::x()
        };
        let up = Vector3::z();
        let back_axis = up.cross(&h);
        let gyro_axis = if direction.norm() > 1e-9 {
            direction.normalize()
        } else {
            h
        };

        back_axis * self.backspin_rpm + up * self.sidespin_rpm + gyro_axis * self.gyro_rpm
    }

    /// Spin axis and magnitude for a ball travelling along `direction`.
    pub fn axis_for(&self, direction: &Vector3<f64>) -> crate::engine::aerodynamics::SpinState {
        crate::engine::aerodynamics::SpinState::from_vector(&self.to_trajectory_vector(direction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backspin_axis_is_left_of_flight() {
        let spin = SpinVector::backspin(1800.0);
        let state = spin.axis_for(&Vector3::new(1.0, 0.0, 0.5));
        assert!((state.axis - Vector3::y()).norm() < 1e-12);
        assert!((state.rpm - 1800.0).abs() < 1e-9);
    }

    #[test]
    fn test_backspin_axis_follows_spray() {
        // Ball to left-centre: backspin axis stays perpendicular to flight
        let dir = Vector3::new(1.0, 1.0, 0.0).normalize();
        let axis = SpinVector::backspin(1000.0).axis_for(&dir).axis;
        assert!(axis.dot(&dir).abs() < 1e-12);
        assert!(axis.z.abs() < 1e-12);
    }

    #[test]
    fn test_total_rpm() {
        let s = SpinVector::new(300.0, 400.0, 0.0);
        assert!((s.total_rpm() - 500.0).abs() < 1e-9);
    }
}
