//! Swing sampling: turns a hitter profile and an incoming pitch into the
//! concrete inputs of one collision.
//!
//! All randomness comes from the caller's RNG.

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};

use super::collision::{ContactOffset, SwingInput};
use super::physics_constants::swing as s;
use super::pitch::PitchResult;
use crate::models::attributes::HitterProfile;

/// The sampled pieces of a swing, kept for replay and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwingSample {
    pub input: SwingInput,
    /// + early (pulls the ball), − late (ms)
    pub timing_error_ms: f64,
    pub launch_noise_deg: f64,
}

fn normal<R: Rng + ?Sized>(rng: &mut R, sigma: f64) -> f64 {
    let n: f64 = StandardNormal.sample(rng);
    n * sigma
}

/// Sample one swing against `pitch`.
///
/// - attack angle: mean + N(0, σ_L) truncated at ±2.5σ_L, with
///   σ_L = 15° + 2·attack variance
/// - contact offsets: N(0, barrel accuracy) per axis
/// - timing: N(0, timing·(1 + 0.3·(v_pitch − 80)/20))
/// - spray: pull tendency + 1.5°/ms·timing + N(0, 18°), within ±45°
pub fn sample_swing<R: Rng + ?Sized>(hitter: &HitterProfile, pitch: &PitchResult, rng: &mut R) -> SwingSample {
    let sigma_launch = s::LAUNCH_SPREAD_BASE_DEG + s::LAUNCH_SPREAD_PER_VARIANCE * hitter.attack_variance_deg;
    let limit = s::LAUNCH_SPREAD_CLAMP_SIGMA * sigma_launch;
    let launch_noise = normal(rng, sigma_launch).clamp(-limit, limit);

    let vertical = normal(rng, hitter.barrel_accuracy_in);
    let horizontal = normal(rng, hitter.barrel_accuracy_in);

    let velocity_factor = 1.0
        + s::TIMING_VELOCITY_FACTOR * (pitch.release_speed_mph - s::TIMING_VELOCITY_REFERENCE_MPH) / 20.0;
    let timing_error = normal(rng, hitter.timing_ms * velocity_factor.max(0.1));

    let spray = (hitter.pull_tendency_deg + s::SPRAY_DEG_PER_MS * timing_error + normal(rng, s::SPRAY_NOISE_DEG))
        .clamp(-s::SPRAY_LIMIT_DEG, s::SPRAY_LIMIT_DEG);

    // Badly mistimed swings lose bat speed
    let late_ms = (timing_error.abs() - s::TIMING_WINDOW_MS).max(0.0);
    let bat_speed = hitter.bat_speed_mph * (1.0 - s::LATE_SWING_SPEED_LOSS_PER_MS * late_ms).max(0.5);

    SwingSample {
        input: SwingInput {
            pitch_speed_mph: pitch.speed_at_plate_mph,
            pitch_angle_deg: pitch.plate_angle_deg,
            bat_speed_mph: bat_speed,
            attack_angle_deg: hitter.attack_angle_deg + launch_noise,
            offset: ContactOffset::new(vertical, horizontal, 0.0),
            spray_angle_deg: spray,
        },
        timing_error_ms: timing_error,
        launch_noise_deg: launch_noise,
    }
}
