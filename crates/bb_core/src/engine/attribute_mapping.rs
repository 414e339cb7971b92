//! Attribute Mapping
//!
//! The single point where abstract ratings become physical quantities.
//!
//! Ratings live on a fine `0..=100_000` scale. The human range is
//! `0..=85_000`; `85_000..=100_000` is superhuman headroom. Each segment is a
//! logistic normalised to hit its end anchors exactly:
//!
//! ```text
//! value
//!   super ┤                                   ╭──
//!     cap ┤                      ╭────────────╯
//!         │                 ╭────╯
//!     min ┤─────────────────╯
//!         └──────────────────────────────────┬──── rating
//!         0                 50k          85k 100k
//! ```
//!
//! `map(0) = min`, `map(85k) = cap`, `map(100k) = super`. The curve is
//! continuous and strictly monotonic, so a higher rating is never worse.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

pub const HUMAN_CAP_RATING: f64 = 85_000.0;
pub const MAX_RATING: f64 = 100_000.0;

/// Logistic steepness across the human range
const HUMAN_STEEPNESS: f64 = 8.0;

/// Logistic steepness across the superhuman range
const SUPER_STEEPNESS: f64 = 5.0;

/// Ratings on the legacy 0–100 scale map to this many fine-scale points each
const LEGACY_SCALE: f64 = 1_000.0;

/// A validated rating on the fine scale.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Rating(f64);

impl Rating {
    pub const MIN: Rating = Rating(0.0);
    pub const AVERAGE: Rating = Rating(50_000.0);
    pub const HUMAN_CAP: Rating = Rating(HUMAN_CAP_RATING);
    pub const MAX: Rating = Rating(MAX_RATING);

    pub fn new(value: f64) -> Result<Self> {
        if value.is_nan() || !(0.0..=MAX_RATING).contains(&value) {
            return Err(SimError::config(
                "rating",
                format!("must be in [0, {MAX_RATING}], got {value}"),
            ));
        }
        Ok(Self(value))
    }

    /// Clamp into range. NaN becomes 0.
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            Self(0.0)
        } else {
            Self(value.clamp(0.0, MAX_RATING))
        }
    }

    /// Boundary adapter for legacy 0–100 ratings. The same percentile maps to
    /// the same physical value on both scales.
    pub fn from_legacy(legacy: f64) -> Result<Self> {
        if legacy.is_nan() || !(0.0..=100.0).contains(&legacy) {
            return Err(SimError::config(
                "legacy_rating",
                format!("must be in [0, 100], got {legacy}"),
            ));
        }
        Self::new(legacy * LEGACY_SCALE)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self::AVERAGE
    }
}

impl TryFrom<f64> for Rating {
    type Error = SimError;

    fn try_from(value: f64) -> Result<Self> {
        Rating::new(value)
    }
}

impl From<Rating> for f64 {
    fn from(r: Rating) -> f64 {
        r.0
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Logistic over `x ∈ [-k/2, k/2]` rescaled to exactly `[0, 1]`.
fn normalized_logistic(t: f64, steepness: f64) -> f64 {
    let half = steepness / 2.0;
    let lo = sigmoid(-half);
    let hi = sigmoid(half);
    (sigmoid(t * steepness - half) - lo) / (hi - lo)
}

/// Human-range progress in `[0, 1]` for a rating (1.0 at and above the cap).
pub fn human_factor(rating: f64) -> f64 {
    let r = rating.clamp(0.0, HUMAN_CAP_RATING);
    normalized_logistic(r / HUMAN_CAP_RATING, HUMAN_STEEPNESS)
}

/// Superhuman progress in `[0, 1]` (0.0 at and below the human cap).
pub fn super_factor(rating: f64) -> f64 {
    let r = rating.clamp(HUMAN_CAP_RATING, MAX_RATING);
    normalized_logistic(
        (r - HUMAN_CAP_RATING) / (MAX_RATING - HUMAN_CAP_RATING),
        SUPER_STEEPNESS,
    )
}

/// Map a rating to a physical value. Ratings are clamped to
/// `[0, 100_000]` first.
pub fn map(rating: f64, human_min: f64, human_cap: f64, super_cap: f64) -> f64 {
    let r = if rating.is_nan() { 0.0 } else { rating.clamp(0.0, MAX_RATING) };
    if r <= HUMAN_CAP_RATING {
        human_min + (human_cap - human_min) * human_factor(r)
    } else {
        human_cap + (super_cap - human_cap) * super_factor(r)
    }
}

/// Map for lower-is-better quantities (reaction time, dispersion).
///
/// Rating 0 gives `worst`, the human cap gives `best`, 100k gives
/// `super_best`.
pub fn map_inverse(rating: f64, best: f64, worst: f64, super_best: f64) -> f64 {
    map(rating, worst, best, super_best)
}

/// Anchors for one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttributeCurve {
    /// Value at rating 0
    pub human_min: f64,
    /// Value at the human cap (85k)
    pub human_cap: f64,
    /// Value at 100k
    pub super_cap: f64,
}

impl AttributeCurve {
    pub const fn new(human_min: f64, human_cap: f64, super_cap: f64) -> Self {
        Self { human_min, human_cap, super_cap }
    }

    /// Lower-is-better curve from its best/worst/superhuman anchors.
    pub const fn inverse(best: f64, worst: f64, super_best: f64) -> Self {
        Self { human_min: worst, human_cap: best, super_cap: super_best }
    }

    pub fn value(&self, rating: Rating) -> f64 {
        map(rating.value(), self.human_min, self.human_cap, self.super_cap)
    }

    pub fn is_inverse(&self) -> bool {
        self.human_cap < self.human_min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BAT: AttributeCurve = AttributeCurve::new(45.0, 73.0, 85.0);
    const REACTION: AttributeCurve = AttributeCurve::inverse(0.14, 0.60, 0.08);

    #[test]
    fn test_anchors_are_exact() {
        assert!((map(0.0, 45.0, 73.0, 85.0) - 45.0).abs() < 1e-12);
        assert!((map(85_000.0, 45.0, 73.0, 85.0) - 73.0).abs() < 1e-12);
        assert!((map(100_000.0, 45.0, 73.0, 85.0) - 85.0).abs() < 1e-12);
    }

    #[test]
    fn test_average_anchor() {
        assert!((human_factor(50_000.0) - 0.6758).abs() < 1e-3);
        let bat = BAT.value(Rating::AVERAGE);
        assert!((bat - 63.9).abs() < 0.1, "bat = {bat}");
    }

    #[test]
    fn test_continuous_at_human_cap() {
        let below = map(HUMAN_CAP_RATING - 1e-6, 45.0, 73.0, 85.0);
        let above = map(HUMAN_CAP_RATING + 1e-6, 45.0, 73.0, 85.0);
        assert!((above - below).abs() < 1e-6);
    }

    #[test]
    fn test_strictly_monotone_over_full_range() {
        let mut prev = BAT.value(Rating::MIN);
        for i in 1..=1000 {
            let v = BAT.value(Rating::clamped(i as f64 * 100.0));
            assert!(v > prev, "not increasing at {}", i * 100);
            prev = v;
        }
    }

    #[test]
    fn test_inverse_curve() {
        assert!((REACTION.value(Rating::MIN) - 0.60).abs() < 1e-12);
        assert!((REACTION.value(Rating::HUMAN_CAP) - 0.14).abs() < 1e-12);
        assert!((REACTION.value(Rating::MAX) - 0.08).abs() < 1e-12);
        assert!(REACTION.value(Rating::AVERAGE) < REACTION.value(Rating::clamped(40_000.0)));
        assert!(REACTION.is_inverse());
        assert!((map_inverse(0.0, 0.14, 0.60, 0.08) - 0.60).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        assert_eq!(map(-5.0, 45.0, 73.0, 85.0), map(0.0, 45.0, 73.0, 85.0));
        assert_eq!(map(250_000.0, 45.0, 73.0, 85.0), map(100_000.0, 45.0, 73.0, 85.0));
        assert_eq!(map(f64::NAN, 45.0, 73.0, 85.0), 45.0);
    }

    #[test]
    fn test_rating_validation() {
        assert!(Rating::new(f64::NAN).is_err());
        assert!(Rating::new(-1.0).is_err());
        assert!(Rating::new(100_001.0).is_err());
        assert_eq!(Rating::new(42_000.0).unwrap().value(), 42_000.0);
        assert_eq!(Rating::clamped(2e6), Rating::MAX);
    }

    #[test]
    fn test_legacy_scale_equivalence() {
        for legacy in [0.0, 25.0, 50.0, 72.5, 85.0, 99.0, 100.0] {
            let fine = Rating::new(legacy * 1000.0).unwrap();
            let adapted = Rating::from_legacy(legacy).unwrap();
            assert_eq!(BAT.value(fine), BAT.value(adapted));
        }
        assert!(Rating::from_legacy(101.0).is_err());
    }

    #[test]
    fn test_rating_serde() {
        let r: Rating = serde_json::from_str("61000.0").unwrap();
        assert_eq!(r.value(), 61_000.0);
        assert!(serde_json::from_str::<Rating>("-3.0").is_err());
        assert_eq!(serde_json::to_string(&r).unwrap(), "61000.0");
    }
}

#[cfg(all(test, feature = "proptest"))]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Higher rating never yields a worse value
        #[test]
        fn prop_map_monotone(a in 0.0f64..100_000.0, b in 0.0f64..100_000.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(map(lo, 45.0, 73.0, 85.0) <= map(hi, 45.0, 73.0, 85.0));
            prop_assert!(map_inverse(lo, 0.14, 0.60, 0.08) >= map_inverse(hi, 0.14, 0.60, 0.08));
        }

        /// Values stay within the anchor envelope
        #[test]
        fn prop_map_bounded(r in -1e6f64..1e6) {
            let v = map(r, 20.0, 29.5, 36.0);
            prop_assert!((20.0..=36.0).contains(&v));
        }
    }
}
