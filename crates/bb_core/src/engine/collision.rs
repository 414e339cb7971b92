//! Collision Model
//!
//! Bat–ball collision via the collision efficiency `q`:
//!
//! ```text
//! EV = q·v_pitch + (1 + q)·v_bat
//! q(d) = q_wood − sweet_spot(d) − offset(d) − vibration(d)
//! ```
//!
//! `d` is the distance (in) between the contact point and the sweet spot.
//! All three penalties are strictly increasing and unfloored, and the final
//! exit velocity passes through a softplus so it stays positive without a
//! flat floor. Exit velocity is therefore strictly decreasing in `d`.

use serde::{Deserialize, Serialize};

use super::physics_constants::collision as c;
use crate::error::{ensure_finite, Result, SimError};
use crate::models::spin::SpinVector;

/// Where the bat met the ball relative to the sweet spot (in).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ContactOffset {
    /// + when the bat meets the ball above its centre (topped)
    pub vertical_in: f64,
    /// + toward the slice side (sidespin toward right field)
    pub horizontal_in: f64,
    /// Along the barrel, toward the end cap or the hands
    pub along_barrel_in: f64,
}

impl ContactOffset {
    pub fn new(vertical_in: f64, horizontal_in: f64, along_barrel_in: f64) -> Self {
        Self { vertical_in, horizontal_in, along_barrel_in }
    }

    pub fn magnitude(&self) -> f64 {
        (self.vertical_in.powi(2) + self.horizontal_in.powi(2) + self.along_barrel_in.powi(2)).sqrt()
    }
}

/// Everything the collision needs from the pitch and the swing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwingInput {
    pub pitch_speed_mph: f64,
    /// Pitch angle at the plate, negative when descending (deg)
    pub pitch_angle_deg: f64,
    pub bat_speed_mph: f64,
    pub attack_angle_deg: f64,
    pub offset: ContactOffset,
    pub spray_angle_deg: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ContactQuality {
    Weak,
    Fair,
    Solid,
    Barrel,
}

impl ContactQuality {
    pub fn from_offset(d: f64) -> Self {
        if d <= c::BARREL_MAX_IN {
            ContactQuality::Barrel
        } else if d <= c::SOLID_MAX_IN {
            ContactQuality::Solid
        } else if d <= c::FAIR_MAX_IN {
            ContactQuality::Fair
        } else {
            ContactQuality::Weak
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactEvent {
    pub exit_velocity_mph: f64,
    pub launch_angle_deg: f64,
    pub spray_angle_deg: f64,
    pub spin: SpinVector,
    pub collision_efficiency: f64,
    pub sweet_spot_offset_in: f64,
    pub quality: ContactQuality,
}

pub fn sweet_spot_penalty(d: f64) -> f64 {
    c::SWEET_SPOT_PENALTY * (1.0 - (-d / c::SWEET_SPOT_SCALE_IN).exp())
}

pub fn offset_penalty(d: f64) -> f64 {
    c::OFFSET_PENALTY_PER_IN * d
}

pub fn vibration_loss(d: f64) -> f64 {
    c::VIBRATION_LOSS * (1.0 - (-d / c::VIBRATION_SCALE_IN).exp())
}

/// Collision efficiency at offset `d` (in). May go negative.
pub fn collision_efficiency(d: f64) -> f64 {
    c::Q_WOOD - sweet_spot_penalty(d) - offset_penalty(d) - vibration_loss(d)
}

fn softplus(x: f64, scale: f64) -> f64 {
    let z = x / scale;
    if z > 30.0 {
        x
    } else {
        scale * z.exp().ln_1p()
    }
}

/// Exit velocity (mph) for a pitch/bat speed pair at offset `d` (in).
pub fn exit_velocity(pitch_speed_mph: f64, bat_speed_mph: f64, d: f64) -> f64 {
    let q = collision_efficiency(d);
    let raw = q * pitch_speed_mph + (1.0 + q) * bat_speed_mph;
    softplus(raw, c::EV_SOFTPLUS_SCALE_MPH)
}

fn validate(input: &SwingInput) -> Result<()> {
    for (field, v) in [
        ("pitch_speed_mph", input.pitch_speed_mph),
        ("bat_speed_mph", input.bat_speed_mph),
    ] {
        ensure_finite(field, v)?;
        if v < 0.0 {
            return Err(SimError::config(field, format!("must be non-negative, got {v}")));
        }
    }
    ensure_finite("pitch_angle_deg", input.pitch_angle_deg)?;
    ensure_finite("attack_angle_deg", input.attack_angle_deg)?;
    ensure_finite("spray_angle_deg", input.spray_angle_deg)?;
    ensure_finite("contact_offset", input.offset.magnitude())?;
    Ok(())
}

/// Resolve one bat–ball collision.
pub fn collide(input: &SwingInput) -> Result<ContactEvent> {
    validate(input)?;
    let d = input.offset.magnitude();
    let q = collision_efficiency(d);
    let ev = exit_velocity(input.pitch_speed_mph, input.bat_speed_mph, d);

    let launch = input.attack_angle_deg - c::LAUNCH_DEG_PER_IN * input.offset.vertical_in
        + c::PITCH_ANGLE_TRANSFER * input.pitch_angle_deg;

    let ev_scale = (ev / 100.0).sqrt();
    let backspin = (c::BASE_BACKSPIN_RPM
        + c::BACKSPIN_PER_LAUNCH_DEG * launch * (input.bat_speed_mph / c::BACKSPIN_REFERENCE_BAT_MPH)
        - c::BACKSPIN_PER_IN * input.offset.vertical_in)
        * ev_scale;
    let sidespin =
        c::SIDESPIN_PER_IN * input.offset.horizontal_in * (ev / 100.0).min(c::SIDESPIN_EV_FACTOR_CAP);

    Ok(ContactEvent {
        exit_velocity_mph: ev,
        launch_angle_deg: launch,
        spray_angle_deg: input.spray_angle_deg,
        spin: SpinVector::new(backspin, sidespin, 0.0),
        collision_efficiency: q,
        sweet_spot_offset_in: d,
        quality: ContactQuality::from_offset(d),
    })
}


#[cfg(all(test, feature = "proptest"))]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Farther from the sweet spot never hits harder
        #[test]
        fn prop_exit_velocity_monotone(
            a in 0.0f64..20.0,
            b in 0.0f64..20.0,
            pitch in 60.0f64..105.0,
            bat in 45.0f64..85.0
        ) {
            prop_assume!((a - b).abs() > 1e-6);
            let (near, far) = if a < b { (a, b) } else { (b, a) };
            prop_assert!(exit_velocity(pitch, bat, near) > exit_velocity(pitch, bat, far));
        }

        /// Faster bats hit harder at the same offset
        #[test]
        fn prop_bat_speed_monotone(d in 0.0f64..3.0, bat in 45.0f64..80.0) {
            prop_assert!(exit_velocity(85.0, bat + 1.0, d) > exit_velocity(85.0, bat, d));
        }
    }
}
