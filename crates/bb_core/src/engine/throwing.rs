//! Throws between fielders and bases.
//!
//! A throw costs the thrower's transfer (glove to release), then a flight
//! that starts at arm speed, bleeds speed to drag, and is stretched by the
//! arc of the ball. Angular error is drawn from the thrower's accuracy; a
//! wide throw pulls the receiver off the bag.

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};

use super::physics_constants::{fielding, throwing, units};
use crate::models::attributes::FielderProfile;
use crate::models::field::FieldPoint;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Throw {
    pub from: FieldPoint,
    pub to: FieldPoint,
    pub distance_ft: f64,
    /// Glove to release (s)
    pub transfer_s: f64,
    pub flight_s: f64,
    pub error_deg: f64,
    /// Extra time for the receiver to gather a wide throw (s)
    pub gather_s: f64,
}

impl Throw {
    /// Time from the fielder securing the ball to the ball arriving.
    pub fn total_s(&self) -> f64 {
        self.transfer_s + self.flight_s + self.gather_s
    }

    pub fn is_off_target(&self) -> bool {
        self.gather_s > 0.0
    }
}

/// Flight time (s) of a throw of `distance_ft` at `arm_mph`.
///
/// Speed decays as `v0·e^(−s/L)` along the path, so the time is
/// `L/v0·(e^(d/L) − 1)`.
pub fn flight_time(arm_mph: f64, distance_ft: f64) -> f64 {
    let mut speed = arm_mph * units::MPH_TO_FPS;
    if distance_ft < throwing::SHORT_THROW_FT {
        speed *= throwing::SHORT_THROW_SPEED_FACTOR;
    }
    let l = throwing::DRAG_LENGTH_FT;
    l / speed * (distance_ft / l).exp_m1() * throwing::ARC_FACTOR
}

/// Expected glove-to-arrival time, ignoring throwing error.
pub fn expected_time(profile: &FielderProfile, from: &FieldPoint, to: &FieldPoint) -> f64 {
    profile.transfer_s + flight_time(profile.arm_mph, from.distance_to(to))
}

fn throw_with_transfer<R: Rng + ?Sized>(
    profile: &FielderProfile,
    from: &FieldPoint,
    to: &FieldPoint,
    transfer_s: f64,
    rng: &mut R,
) -> Throw {
    let distance = from.distance_to(to);
    let z: f64 = StandardNormal.sample(rng);
    let error_deg = z * profile.arm_accuracy_deg;
    let gather_s = if error_deg.abs() > throwing::OFF_TARGET_DEG { throwing::OFF_TARGET_DELAY } else { 0.0 };
    Throw {
        from: *from,
        to: *to,
        distance_ft: distance,
        transfer_s,
        flight_s: flight_time(profile.arm_mph, distance),
        error_deg,
        gather_s,
    }
}

/// Throw after fielding a ball.
pub fn throw<R: Rng + ?Sized>(profile: &FielderProfile, from: &FieldPoint, to: &FieldPoint, rng: &mut R) -> Throw {
    throw_with_transfer(profile, from, to, profile.transfer_s, rng)
}

/// Relay from a middle infielder who caught a throw at the bag.
pub fn relay<R: Rng + ?Sized>(profile: &FielderProfile, from: &FieldPoint, to: &FieldPoint, rng: &mut R) -> Throw {
    throw_with_transfer(profile, from, to, fielding::PIVOT_TRANSFER, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::attribute_mapping::Rating;
    use crate::models::attributes::FielderAttributes;
    use crate::models::field::Base;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_flight_time() {
        // 90 mph = 132 ft/s; drag adds about 13% over 132 ft
        let t = flight_time(90.0, 132.0);
        assert!(t > 1.05 && t < 1.25, "flight {t}");
        // Long throws lose proportionally more
        assert!(flight_time(90.0, 300.0) > 2.0 * flight_time(90.0, 150.0));
        // Short throws are lobbed
        assert!(flight_time(90.0, 30.0) > 30.0 / 132.0 * 1.05);
        assert_eq!(flight_time(90.0, 0.0), 0.0);
    }

    #[test]
    fn test_stronger_arm_is_faster() {
        let weak = FielderAttributes::uniform(Rating::clamped(10_000.0)).profile();
        let strong = FielderAttributes::uniform(Rating::HUMAN_CAP).profile();
        let (from, to) = (Base::Third.location(), Base::First.location());
        assert!(expected_time(&strong, &from, &to) < expected_time(&weak, &from, &to));
    }

    #[test]
    fn test_accuracy_controls_wide_throws() {
        let wild = FielderAttributes::uniform(Rating::MIN).profile();
        let sharp = FielderAttributes::uniform(Rating::HUMAN_CAP).profile();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let (from, to) = (FieldPoint::new(-40.0, 140.0), Base::First.location());
        let wide = |p: &FielderProfile, rng: &mut ChaCha8Rng| (0..500).filter(|_| throw(p, &from, &to, &mut *rng).is_off_target()).count();
        assert!(wide(&sharp, &mut rng) < wide(&wild, &mut rng));
    }

    #[test]
    fn test_relay_uses_pivot_transfer() {
        let p = FielderAttributes::default().profile();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let t = relay(&p, &Base::Second.location(), &Base::First.location(), &mut rng);
        assert_eq!(t.transfer_s, fielding::PIVOT_TRANSFER);
        assert!(t.total_s() >= t.transfer_s + t.flight_s);
    }
}
