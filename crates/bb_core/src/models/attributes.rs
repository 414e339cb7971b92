//! Player attribute sets and their physical profiles.
//!
//! Each role stores abstract [`Rating`]s. `profile()` runs every rating through
//! its [`AttributeCurve`] once, so the simulation only ever sees physical
//! units.

use serde::{Deserialize, Serialize};

use crate::engine::attribute_mapping::{AttributeCurve, Rating};
use crate::engine::physics_constants::units;

/// Anchors (value at 0 / human cap / 100k) for every mapped attribute.
pub mod curves {
    use super::AttributeCurve;

    // Hitter
    pub const BAT_SPEED_MPH: AttributeCurve = AttributeCurve::new(45.0, 73.0, 85.0);
    pub const ATTACK_ANGLE_DEG: AttributeCurve = AttributeCurve::new(-5.0, 28.0, 40.0);
    pub const ATTACK_VARIANCE_DEG: AttributeCurve = AttributeCurve::inverse(1.0, 8.0, 0.3);
    pub const BARREL_ACCURACY_MM: AttributeCurve = AttributeCurve::inverse(7.0, 40.0, 2.0);
    pub const TIMING_MS: AttributeCurve = AttributeCurve::inverse(3.0, 15.0, 1.0);
    pub const PULL_TENDENCY_DEG: AttributeCurve = AttributeCurve::new(-6.0, 16.0, 22.0);

    // Fielder
    pub const REACTION_S: AttributeCurve = AttributeCurve::inverse(0.14, 0.60, 0.08);
    pub const FIELDER_ACCEL_FPS2: AttributeCurve = AttributeCurve::new(8.0, 15.0, 20.0);
    pub const FIELDER_TOP_SPEED_FPS: AttributeCurve = AttributeCurve::new(20.0, 29.5, 36.0);
    pub const ROUTE_EFFICIENCY: AttributeCurve = AttributeCurve::new(0.70, 0.96, 0.99);
    pub const TRANSFER_S: AttributeCurve = AttributeCurve::inverse(0.30, 0.85, 0.18);
    pub const ARM_MPH: AttributeCurve = AttributeCurve::new(60.0, 92.0, 105.0);
    pub const ARM_ACCURACY_DEG: AttributeCurve = AttributeCurve::inverse(1.5, 8.0, 0.5);
    pub const SURE_HANDS_S: AttributeCurve = AttributeCurve::new(-0.10, 0.10, 0.12);

    // Pitcher
    pub const PITCH_VELOCITY_MPH: AttributeCurve = AttributeCurve::new(70.0, 98.0, 108.0);
    pub const SPIN_RPM: AttributeCurve = AttributeCurve::new(1600.0, 2700.0, 3400.0);
    pub const SPIN_EFFICIENCY_PCT: AttributeCurve = AttributeCurve::new(70.0, 96.0, 99.0);
    pub const COMMAND_IN: AttributeCurve = AttributeCurve::inverse(1.8, 8.0, 0.8);

    // Runner
    pub const SPRINT_SPEED_FPS: AttributeCurve = AttributeCurve::new(21.0, 30.5, 35.0);
    pub const RUNNER_ACCEL_FPS2: AttributeCurve = AttributeCurve::new(12.0, 20.0, 24.0);
    pub const RUNNER_REACTION_S: AttributeCurve = AttributeCurve::inverse(0.15, 0.45, 0.08);
    pub const TURN_RETENTION: AttributeCurve = AttributeCurve::new(0.75, 0.92, 0.95);
    pub const SLIDE_EFFICIENCY: AttributeCurve = AttributeCurve::new(0.0, 1.0, 1.0);
    pub const LEAD_FACTOR: AttributeCurve = AttributeCurve::new(0.5, 1.0, 1.1);
}

// ============================================================
// Hitter
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HitterAttributes {
    pub bat_speed: Rating,
    pub attack_angle: Rating,
    pub attack_consistency: Rating,
    pub barrel_accuracy: Rating,
    pub timing: Rating,
    pub pull_tendency: Rating,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitterProfile {
    pub bat_speed_mph: f64,
    pub attack_angle_deg: f64,
    pub attack_variance_deg: f64,
    /// 1σ contact offset per axis (in)
    pub barrel_accuracy_in: f64,
    /// 1σ timing error at 80 mph (ms)
    pub timing_ms: f64,
    /// Mean spray toward the pull side (deg)
    pub pull_tendency_deg: f64,
}

impl HitterAttributes {
    pub fn uniform(r: Rating) -> Self {
        Self {
            bat_speed: r,
            attack_angle: r,
            attack_consistency: r,
            barrel_accuracy: r,
            timing: r,
            pull_tendency: r,
        }
    }

    pub fn profile(&self) -> HitterProfile {
        HitterProfile {
            bat_speed_mph: curves::BAT_SPEED_MPH.value(self.bat_speed),
            attack_angle_deg: curves::ATTACK_ANGLE_DEG.value(self.attack_angle),
            attack_variance_deg: curves::ATTACK_VARIANCE_DEG.value(self.attack_consistency),
            barrel_accuracy_in: curves::BARREL_ACCURACY_MM.value(self.barrel_accuracy) * units::MM_TO_IN,
            timing_ms: curves::TIMING_MS.value(self.timing),
            pull_tendency_deg: curves::PULL_TENDENCY_DEG.value(self.pull_tendency),
        }
    }
}

// ============================================================
// Fielder
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FielderAttributes {
    pub reaction: Rating,
    pub acceleration: Rating,
    pub top_speed: Rating,
    pub route_efficiency: Rating,
    pub transfer: Rating,
    pub arm_strength: Rating,
    pub arm_accuracy: Rating,
    pub sure_hands: Rating,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FielderProfile {
    pub reaction_s: f64,
    pub acceleration_fps2: f64,
    pub top_speed_fps: f64,
    /// Straight-line distance / actual path length
    pub route_efficiency: f64,
    pub transfer_s: f64,
    pub arm_mph: f64,
    /// 1σ angular throw error (deg)
    pub arm_accuracy_deg: f64,
    /// Catch-margin shift (s); positive helps
    pub sure_hands_s: f64,
}

impl FielderAttributes {
    pub fn uniform(r: Rating) -> Self {
        Self {
            reaction: r,
            acceleration: r,
            top_speed: r,
            route_efficiency: r,
            transfer: r,
            arm_strength: r,
            arm_accuracy: r,
            sure_hands: r,
        }
    }

    pub fn profile(&self) -> FielderProfile {
        FielderProfile {
            reaction_s: curves::REACTION_S.value(self.reaction),
            acceleration_fps2: curves::FIELDER_ACCEL_FPS2.value(self.acceleration),
            top_speed_fps: curves::FIELDER_TOP_SPEED_FPS.value(self.top_speed),
            route_efficiency: curves::ROUTE_EFFICIENCY.value(self.route_efficiency),
            transfer_s: curves::TRANSFER_S.value(self.transfer),
            arm_mph: curves::ARM_MPH.value(self.arm_strength),
            arm_accuracy_deg: curves::ARM_ACCURACY_DEG.value(self.arm_accuracy),
            sure_hands_s: curves::SURE_HANDS_S.value(self.sure_hands),
        }
    }
}

// ============================================================
// Pitcher
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PitcherAttributes {
    pub velocity: Rating,
    pub spin_rate: Rating,
    pub spin_efficiency: Rating,
    pub command: Rating,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitcherProfile {
    pub velocity_mph: f64,
    pub spin_rpm: f64,
    /// Fraction of spin that produces movement, 0–1
    pub spin_efficiency: f64,
    /// 1σ miss distance per axis (in)
    pub command_in: f64,
}

impl PitcherAttributes {
    pub fn uniform(r: Rating) -> Self {
        Self { velocity: r, spin_rate: r, spin_efficiency: r, command: r }
    }

    pub fn profile(&self) -> PitcherProfile {
        PitcherProfile {
            velocity_mph: curves::PITCH_VELOCITY_MPH.value(self.velocity),
            spin_rpm: curves::SPIN_RPM.value(self.spin_rate),
            spin_efficiency: curves::SPIN_EFFICIENCY_PCT.value(self.spin_efficiency) / 100.0,
            command_in: curves::COMMAND_IN.value(self.command),
        }
    }
}

// ============================================================
// Runner
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RunnerAttributes {
    pub sprint_speed: Rating,
    pub acceleration: Rating,
    pub reaction: Rating,
    pub baserunning: Rating,
    pub sliding: Rating,
    pub aggressiveness: Rating,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunnerProfile {
    pub sprint_speed_fps: f64,
    pub acceleration_fps2: f64,
    pub reaction_s: f64,
    /// Speed kept through each rounded base
    pub turn_retention: f64,
    /// 0 = slide costs the full deceleration penalty, 1 = none
    pub slide_efficiency: f64,
    /// Multiplier on the standard lead-off
    pub lead_factor: f64,
}

impl RunnerAttributes {
    pub fn uniform(r: Rating) -> Self {
        Self {
            sprint_speed: r,
            acceleration: r,
            reaction: r,
            baserunning: r,
            sliding: r,
            aggressiveness: r,
        }
    }

    pub fn profile(&self) -> RunnerProfile {
        RunnerProfile {
            sprint_speed_fps: curves::SPRINT_SPEED_FPS.value(self.sprint_speed),
            acceleration_fps2: curves::RUNNER_ACCEL_FPS2.value(self.acceleration),
            reaction_s: curves::RUNNER_REACTION_S.value(self.reaction),
            turn_retention: curves::TURN_RETENTION.value(self.baserunning),
            slide_efficiency: curves::SLIDE_EFFICIENCY.value(self.sliding),
            lead_factor: curves::LEAD_FACTOR.value(self.aggressiveness),
        }
    }
}
