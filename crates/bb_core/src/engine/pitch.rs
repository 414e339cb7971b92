//! Pitch Trajectory Simulator
//!
//! Flies a pitch from the release point to the front of home plate in the
//! trajectory frame (the ball travels toward −x). Movement is described by a
//! spin rate, a spin efficiency and a movement angle:
//!
//! ```text
//!   catcher's view, RHP           φ = 0    pure ride (backspin)
//!                                 φ = 90°  pure arm-side run
//!          ↑ 0°                   φ = 180° pure drop (topspin)
//!    arm   │                      φ < 0    glove side
//!   side ←─┼─→ glove side
//!          │
//! ```
//!
//! Break is measured against the straight-line, force-free path of the
//! release velocity.

use nalgebra::Vector3;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::aerodynamics::{BallAerodynamics, SpinState};
use super::config::SimConfig;
use super::environment::Environment;
use super::integrator::{integrate, stop_at_plate_or_ground, Crossing, State, TrajectorySample};
use super::physics_constants::{ball, pitch, units};
use crate::error::{ensure_finite, Result, SimError};
use crate::models::attributes::PitcherProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PitchType {
    FourSeam,
    TwoSeam,
    Cutter,
    Curveball,
    Slider,
    Changeup,
    Splitter,
    Knuckleball,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Handedness {
    #[default]
    Right,
    Left,
}

impl Handedness {
    /// Trajectory-frame lateral sign of the pitcher's arm side.
    fn arm_side_sign(self) -> f64 {
        match self {
            Handedness::Right => 1.0,
            Handedness::Left => -1.0,
        }
    }
}

/// Archetype values: (mph, rpm, spin efficiency, movement angle °)
impl PitchType {
    pub const ALL: [PitchType; 8] = [
        PitchType::FourSeam,
        PitchType::TwoSeam,
        PitchType::Cutter,
        PitchType::Curveball,
        PitchType::Slider,
        PitchType::Changeup,
        PitchType::Splitter,
        PitchType::Knuckleball,
    ];

    pub fn archetype(self) -> (f64, f64, f64, f64) {
        match self {
            PitchType::FourSeam => (93.0, 2200.0, 0.85, 35.0),
            PitchType::TwoSeam => (92.0, 2100.0, 0.85, 65.0),
            PitchType::Cutter => (88.0, 2200.0, 0.50, -30.0),
            PitchType::Curveball => (78.0, 2500.0, 0.70, 200.0),
            PitchType::Slider => (85.0, 2400.0, 0.40, -100.0),
            PitchType::Changeup => (84.0, 1750.0, 0.85, 60.0),
            PitchType::Splitter => (85.0, 1500.0, 0.50, 80.0),
            PitchType::Knuckleball => (72.0, 200.0, 0.10, 0.0),
        }
    }
}

/// Where the pitch is aimed as it crosses the plate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlateLocation {
    /// Catcher's view, + toward the first-base side (ft)
    pub horizontal_ft: f64,
    pub height_ft: f64,
}

impl PlateLocation {
    pub fn middle() -> Self {
        Self { horizontal_ft: 0.0, height_ft: pitch::ZONE_CENTER_FT }
    }

    fn to_trajectory_m(self) -> Vector3<f64> {
        Vector3::new(0.0, -self.horizontal_ft * units::FT_TO_M, self.height_ft * units::FT_TO_M)
    }

    fn from_trajectory_m(p: &Vector3<f64>) -> Self {
        Self { horizontal_ft: -p.y * units::M_TO_FT, height_ft: p.z * units::M_TO_FT }
    }

    pub fn is_strike(&self) -> bool {
        let half_width_ft = (pitch::PLATE_WIDTH_IN / 2.0) / 12.0 + ball::RADIUS * units::M_TO_FT;
        let r = ball::RADIUS * units::M_TO_FT;
        self.horizontal_ft.abs() <= half_width_ft
            && self.height_ft >= pitch::ZONE_BOTTOM_FT - r
            && self.height_ft <= pitch::ZONE_TOP_FT + r
    }
}

impl Default for PlateLocation {
    fn default() -> Self {
        Self::middle()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchSpec {
    pub pitch_type: PitchType,
    pub velocity_mph: f64,
    pub spin_rpm: f64,
    /// Share of spin that is transverse (0–1); the rest is gyro
    pub spin_efficiency: f64,
    pub movement_angle_deg: f64,
    pub hand: Handedness,
    pub target: PlateLocation,
}

impl PitchSpec {
    /// League-average version of a pitch type, aimed down the middle.
    pub fn archetype(pitch_type: PitchType, hand: Handedness) -> Self {
        let (mph, rpm, eff, angle) = pitch_type.archetype();
        Self {
            pitch_type,
            velocity_mph: mph,
            spin_rpm: rpm,
            spin_efficiency: eff,
            movement_angle_deg: angle,
            hand,
            target: PlateLocation::middle(),
        }
    }

    /// Scale an archetype by a pitcher's mapped ability and apply command
    /// scatter around `intended`.
    pub fn from_pitcher<R: Rng + ?Sized>(
        pitch_type: PitchType,
        hand: Handedness,
        profile: &PitcherProfile,
        intended: PlateLocation,
        rng: &mut R,
    ) -> Self {
        let mut spec = Self::archetype(pitch_type, hand);
        spec.velocity_mph *= profile.velocity_mph / pitch::REFERENCE_VELOCITY_MPH;
        spec.spin_rpm *= profile.spin_rpm / pitch::REFERENCE_SPIN_RPM;
        spec.spin_efficiency =
            (spec.spin_efficiency * profile.spin_efficiency / pitch::REFERENCE_SPIN_EFFICIENCY).clamp(0.0, 1.0);

        if pitch_type == PitchType::Knuckleball {
            spec.movement_angle_deg = rng.gen_range(-180.0..180.0);
        }

        let sigma_ft = profile.command_in / 12.0;
        let dx: f64 = StandardNormal.sample(rng);
        let dz: f64 = StandardNormal.sample(rng);
        spec.target = PlateLocation {
            horizontal_ft: intended.horizontal_ft + dx * sigma_ft,
            height_ft: intended.height_ft + dz * sigma_ft,
        };
        spec
    }

    pub fn with_target(mut self, target: PlateLocation) -> Self {
        self.target = target;
        self
    }

    fn validate(&self) -> Result<()> {
        ensure_finite("velocity_mph", self.velocity_mph)?;
        if self.velocity_mph <= 0.0 {
            return Err(SimError::config("velocity_mph", "must be positive"));
        }
        ensure_finite("spin_rpm", self.spin_rpm)?;
        if self.spin_rpm < 0.0 {
            return Err(SimError::config("spin_rpm", "must be non-negative"));
        }
        if !(0.0..=1.0).contains(&self.spin_efficiency) {
            return Err(SimError::config("spin_efficiency", "must be in [0, 1]"));
        }
        ensure_finite("movement_angle_deg", self.movement_angle_deg)?;
        ensure_finite("target", self.target.horizontal_ft + self.target.height_ft)?;
        Ok(())
    }

    /// Spin for a pitch launched along `v_hat`.
    fn spin_state(&self, v_hat: &Vector3<f64>) -> SpinState {
        let phi = self.movement_angle_deg.to_radians();
        let arm_side = Vector3::new(0.0, self.hand.arm_side_sign(), 0.0);
        let desired = Vector3::z() * phi.cos() + arm_side * phi.sin();
        let movement = desired - v_hat * v_hat.dot(&desired);
        if movement.norm() < 1e-9 {
            return SpinState::new(*v_hat, self.spin_rpm);
        }
        // v̂ × (m × v̂) = m for m ⊥ v̂
        let transverse_axis = movement.normalize().cross(v_hat);
        let eff = self.spin_efficiency;
        // Gyro component mirrors with handedness like the rest of the axis
        let gyro = self.hand.arm_side_sign() * self.spin_rpm * (1.0 - eff * eff).max(0.0).sqrt();
        let omega = transverse_axis * (self.spin_rpm * eff) + v_hat * gyro;
        SpinState::from_vector(&omega)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReleasePoint {
    /// Distance in front of the plate (ft)
    pub distance_ft: f64,
    pub height_ft: f64,
    /// Catcher's view, + toward the first-base side (ft)
    pub lateral_ft: f64,
}

impl Default for ReleasePoint {
    fn default() -> Self {
        Self {
            distance_ft: pitch::RUBBER_TO_PLATE_FT - pitch::DEFAULT_EXTENSION_FT,
            height_ft: pitch::DEFAULT_RELEASE_HEIGHT_FT,
            lateral_ft: 0.0,
        }
    }
}

impl ReleasePoint {
    fn to_trajectory_m(self) -> Vector3<f64> {
        Vector3::new(
            self.distance_ft * units::FT_TO_M,
            -self.lateral_ft * units::FT_TO_M,
            self.height_ft * units::FT_TO_M,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchResult {
    pub pitch_type: PitchType,
    /// Trajectory-frame velocity at the plate (m/s)
    pub velocity_at_plate: Vector3<f64>,
    pub speed_at_plate_mph: f64,
    pub release_speed_mph: f64,
    pub location_at_plate: PlateLocation,
    /// Vertical deviation from the straight line, gravity included (in)
    pub vertical_break_in: f64,
    /// Vertical break with gravity removed (in)
    pub induced_vertical_break_in: f64,
    /// Horizontal deviation, + toward the pitcher's arm side (in)
    pub horizontal_break_in: f64,
    pub flight_time_s: f64,
    /// Angle of the velocity at the plate, negative when descending (deg)
    pub plate_angle_deg: f64,
    pub is_strike: bool,
    /// False when the ball hit the ground before the plate
    pub reached_plate: bool,
    #[serde(default)]
    pub samples: Vec<TrajectorySample>,
}

/// Release velocity aimed at `aim` with a gravity-drop allowance.
fn aim_velocity(release: &Vector3<f64>, aim: &Vector3<f64>, speed_ms: f64) -> Vector3<f64> {
    let mut d = aim - release;
    let horizontal = d.xy().norm();
    let t_est = horizontal / speed_ms;
    d.z += 0.5 * ball::GRAVITY * t_est * t_est;
    d.normalize() * speed_ms
}

fn fly(
    spec: &PitchSpec,
    release: &ReleasePoint,
    aim: &Vector3<f64>,
    env: &Environment,
    config: &SimConfig,
) -> Result<PitchResult> {
    let start = release.to_trajectory_m();
    let v0 = aim_velocity(&start, aim, spec.velocity_mph * units::MPH_TO_MS);
    let v_hat = v0.normalize();
    let spin = spec.spin_state(&v_hat);
    let forces = BallAerodynamics::new(env, spin);

    let result = integrate(State::new(start, v0), &forces, config, stop_at_plate_or_ground)?;
    let s = &result.summary;
    let t = s.hang_time;

    // Force-free straight line to the same plane
    let straight = if v0.x.abs() > 1e-9 {
        start + v0 * (start.x / -v0.x)
    } else {
        start
    };
    let end = s.landing_position;
    let arm = spec.hand.arm_side_sign();

    let vertical_break_in = (end.z - straight.z) * units::M_TO_IN;
    let gravity_drop_in = 0.5 * ball::GRAVITY * t * t * units::M_TO_IN;
    let v_end = s.landing_velocity;
    let location = PlateLocation::from_trajectory_m(&end);
    let reached_plate = s.termination == Crossing::Plate;

    Ok(PitchResult {
        pitch_type: spec.pitch_type,
        velocity_at_plate: v_end,
        speed_at_plate_mph: v_end.norm() * units::MS_TO_MPH,
        release_speed_mph: spec.velocity_mph,
        location_at_plate: location,
        vertical_break_in,
        induced_vertical_break_in: vertical_break_in + gravity_drop_in,
        horizontal_break_in: (end.y - straight.y) * units::M_TO_IN * arm,
        flight_time_s: t,
        plate_angle_deg: v_end.z.atan2(v_end.xy().norm()).to_degrees(),
        is_strike: reached_plate && location.is_strike(),
        reached_plate,
        samples: result.samples,
    })
}

/// Simulate a pitch aimed straight at its target (gravity compensated only).
pub fn simulate_pitch(
    spec: &PitchSpec,
    release: &ReleasePoint,
    env: &Environment,
    config: &SimConfig,
) -> Result<PitchResult> {
    spec.validate()?;
    let result = fly(spec, release, &spec.target.to_trajectory_m(), env, config)?;
    if config.debug_enabled() {
        debug!(
            pitch = ?spec.pitch_type,
            ivb = result.induced_vertical_break_in,
            hb = result.horizontal_break_in,
            mph = result.speed_at_plate_mph,
            "pitch simulated"
        );
    }
    Ok(result)
}

/// Simulate a pitch whose aim point is refined so it crosses at the target
/// despite its movement.
pub fn simulate_pitch_on_target(
    spec: &PitchSpec,
    release: &ReleasePoint,
    env: &Environment,
    config: &SimConfig,
) -> Result<PitchResult> {
    spec.validate()?;
    let target = spec.target.to_trajectory_m();
    let mut aim = target;
    let mut result = fly(spec, release, &aim, env, config)?;

    for _ in 0..pitch::AIM_ITERATIONS {
        if !result.reached_plate {
            break;
        }
        let actual = result.location_at_plate.to_trajectory_m();
        let miss = actual - target;
        aim -= miss * pitch::AIM_CORRECTION;
        result = fly(spec, release, &aim, env, config)?;
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::attribute_mapping::Rating;
    use crate::models::attributes::PitcherAttributes;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn run(t: PitchType) -> PitchResult {
        let spec = PitchSpec::archetype(t, Handedness::Right);
        simulate_pitch(&spec, &ReleasePoint::default(), &Environment::standard(), &SimConfig::default())
            .unwrap()
    }

    #[test]
    fn test_four_seam_rides_and_runs() {
        let r = run(PitchType::FourSeam);
        assert!(r.reached_plate);
        assert!(r.induced_vertical_break_in > 12.0, "ivb {}", r.induced_vertical_break_in);
        assert!(r.horizontal_break_in > 5.0, "hb {}", r.horizontal_break_in);
        assert!(r.speed_at_plate_mph < 93.0 && r.speed_at_plate_mph > 80.0);
        assert!((0.38..0.48).contains(&r.flight_time_s), "t {}", r.flight_time_s);
        assert!(r.plate_angle_deg < 0.0);
    }

    #[test]
    fn test_curveball_drops() {
        let curve = run(PitchType::Curveball);
        let fastball = run(PitchType::FourSeam);
        assert!(curve.induced_vertical_break_in < -5.0);
        assert!(curve.vertical_break_in < fastball.vertical_break_in - 20.0);
        assert!(curve.flight_time_s > fastball.flight_time_s);
    }

    #[test]
    fn test_slider_and_cutter_move_glove_side() {
        assert!(run(PitchType::Slider).horizontal_break_in < -4.0);
        assert!(run(PitchType::Cutter).horizontal_break_in < 0.0);
    }

    #[test]
    fn test_changeup_fades_arm_side() {
        let ch = run(PitchType::Changeup);
        assert!(ch.horizontal_break_in > 8.0);
        assert!(ch.induced_vertical_break_in < run(PitchType::FourSeam).induced_vertical_break_in);
    }

    #[test]
    fn test_lefty_mirrors_righty_in_field_frame() {
        let env = Environment::standard();
        let cfg = SimConfig::default();
        let r = simulate_pitch(&PitchSpec::archetype(PitchType::Slider, Handedness::Right), &ReleasePoint::default(), &env, &cfg).unwrap();
        let l = simulate_pitch(&PitchSpec::archetype(PitchType::Slider, Handedness::Left), &ReleasePoint::default(), &env, &cfg).unwrap();
        // Same arm-side break, mirrored plate location
        assert!((r.horizontal_break_in - l.horizontal_break_in).abs() < 1e-6);
        assert!((r.location_at_plate.horizontal_ft + l.location_at_plate.horizontal_ft).abs() < 1e-6);
    }

    #[test]
    fn test_aim_refinement_hits_target() {
        let spec = PitchSpec::archetype(PitchType::Curveball, Handedness::Right)
            .with_target(PlateLocation { horizontal_ft: 0.5, height_ft: 2.0 });
        let r = simulate_pitch_on_target(&spec, &ReleasePoint::default(), &Environment::standard(), &SimConfig::default()).unwrap();
        assert!((r.location_at_plate.horizontal_ft - 0.5).abs() < 0.05);
        assert!((r.location_at_plate.height_ft - 2.0).abs() < 0.05);
        assert!(r.is_strike);
    }

    #[test]
    fn test_ball_in_dirt_does_not_reach_plate() {
        let spec = PitchSpec::archetype(PitchType::Curveball, Handedness::Right)
            .with_target(PlateLocation { horizontal_ft: 0.0, height_ft: -3.0 });
        let r = simulate_pitch(&spec, &ReleasePoint::default(), &Environment::standard(), &SimConfig::default()).unwrap();
        assert!(!r.reached_plate);
        assert!(!r.is_strike);
    }

    #[test]
    fn test_strike_zone_edges() {
        assert!(PlateLocation::middle().is_strike());
        assert!(!PlateLocation { horizontal_ft: 1.0, height_ft: 2.5 }.is_strike());
        assert!(!PlateLocation { horizontal_ft: 0.0, height_ft: 4.0 }.is_strike());
    }

    #[test]
    fn test_invalid_spec_rejected() {
        let mut spec = PitchSpec::archetype(PitchType::FourSeam, Handedness::Right);
        spec.spin_efficiency = 1.5;
        let r = simulate_pitch(&spec, &ReleasePoint::default(), &Environment::standard(), &SimConfig::default());
        assert!(matches!(r, Err(SimError::Configuration { .. })));
    }

    #[test]
    fn test_from_pitcher_is_deterministic() {
        let profile = PitcherAttributes::uniform(Rating::clamped(70_000.0)).profile();
        let mut a = ChaCha8Rng::seed_from_u64(42);
        let mut b = ChaCha8Rng::seed_from_u64(42);
        let sa = PitchSpec::from_pitcher(PitchType::Knuckleball, Handedness::Right, &profile, PlateLocation::middle(), &mut a);
        let sb = PitchSpec::from_pitcher(PitchType::Knuckleball, Handedness::Right, &profile, PlateLocation::middle(), &mut b);
        assert_eq!(sa, sb);
    }

    #[test]
    fn test_better_pitcher_throws_harder() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let weak = PitcherAttributes::uniform(Rating::clamped(20_000.0)).profile();
        let ace = PitcherAttributes::uniform(Rating::HUMAN_CAP).profile();
        let w = PitchSpec::from_pitcher(PitchType::FourSeam, Handedness::Right, &weak, PlateLocation::middle(), &mut rng);
        let a = PitchSpec::from_pitcher(PitchType::FourSeam, Handedness::Right, &ace, PlateLocation::middle(), &mut rng);
        assert!(a.velocity_mph > w.velocity_mph);
        assert!(a.spin_rpm > w.spin_rpm);
    }
}
