//! Coordinate frames and unit conversion
//!
//! ## Coordinate Systems
//!
//! **Trajectory frame** (used by the integrator, metres):
//! - X: home plate toward centre field
//! - Y: lateral, positive toward LEFT field
//! - Z: up
//!
//! **Field frame** (used by fielding and baserunning, feet):
//! - X: lateral, positive toward RIGHT field
//! - Y: home plate toward centre field
//! - Z: up
//!
//! Both frames are right-handed and share the origin at the point of home
//! plate. The conversion is `field = (-traj.y, traj.x, traj.z)`, plus m→ft.
//!
//! Spray angles are measured from straight-away centre, positive toward left
//! field (the pull side for a right-handed hitter).

use nalgebra::Vector3;

use super::physics_constants::units;
use crate::models::field::FieldPoint;

/// Trajectory-frame metres → field-frame feet.
pub fn to_field_ft(traj_m: &Vector3<f64>) -> Vector3<f64> {
    Vector3::new(-traj_m.y, traj_m.x, traj_m.z) * units::M_TO_FT
}

/// Field-frame feet → trajectory-frame metres.
pub fn to_trajectory_m(field_ft: &Vector3<f64>) -> Vector3<f64> {
    Vector3::new(field_ft.y, -field_ft.x, field_ft.z) * units::FT_TO_M
}

/// Field-frame velocity (mph) → trajectory-frame velocity (m/s).
pub fn field_mph_to_trajectory_ms(field_mph: &Vector3<f64>) -> Vector3<f64> {
    Vector3::new(field_mph.y, -field_mph.x, field_mph.z) * units::MPH_TO_MS
}

/// Ground projection of a trajectory-frame point, in field feet.
pub fn ground_point(traj_m: &Vector3<f64>) -> FieldPoint {
    let f = to_field_ft(traj_m);
    FieldPoint::new(f.x, f.y)
}

/// Spray angle of a field point, degrees from centre (+ = left field).
pub fn spray_angle_deg(point: &FieldPoint) -> f64 {
    (-point.x).atan2(point.y).to_degrees()
}

/// Unit horizontal direction in the trajectory frame for a spray angle.
pub fn spray_direction(spray_deg: f64) -> Vector3<f64> {
    let s = spray_deg.to_radians();
    Vector3::new(s.cos(), s.sin(), 0.0)
}

/// Initial velocity (m/s, trajectory frame) from speed and angles.
pub fn launch_velocity(speed_mph: f64, launch_deg: f64, spray_deg: f64) -> Vector3<f64> {
    let v = speed_mph * units::MPH_TO_MS;
    let la = launch_deg.to_radians();
    let sp = spray_deg.to_radians();
    Vector3::new(
        v * la.cos() * sp.cos(),
        v * la.cos() * sp.sin(),
        v * la.sin(),
    )
}


#[cfg(all(test, feature = "proptest"))]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Field → trajectory → field is the identity
        #[test]
        fn prop_field_round_trip(
            x in -500.0f64..500.0,
            y in -100.0f64..600.0,
            z in 0.0f64..200.0
        ) {
            let p = Vector3::new(x, y, z);
            let back = to_field_ft(&to_trajectory_m(&p));
            prop_assert!((back - p).norm() < 1e-9);
        }

        /// Trajectory → field → trajectory is the identity
        #[test]
        fn prop_trajectory_round_trip(
            x in -50.0f64..200.0,
            y in -150.0f64..150.0,
            z in -5.0f64..60.0
        ) {
            let p = Vector3::new(x, y, z);
            let back = to_trajectory_m(&to_field_ft(&p));
            prop_assert!((back - p).norm() < 1e-9);
        }

        /// Distances are preserved up to the unit factor
        #[test]
        fn prop_distance_preserved(
            x in -150.0f64..150.0,
            y in -150.0f64..150.0
        ) {
            let p = Vector3::new(x, y, 0.0);
            let f = to_field_ft(&p);
            prop_assert!((f.norm() - p.norm() * units::M_TO_FT).abs() < 1e-6);
        }
    }
}
