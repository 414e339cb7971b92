//! Field geometry in the field frame (feet, home plate at the origin).

use serde::{Deserialize, Serialize};

use crate::engine::physics_constants::field;

/// Ground-level point in the field frame (ft).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldPoint {
    pub x: f64,
    pub y: f64,
}

impl FieldPoint {
    pub const HOME: FieldPoint = FieldPoint { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &FieldPoint) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn distance_from_home(&self) -> f64 {
        self.distance_to(&FieldPoint::HOME)
    }

    pub fn lerp(&self, other: &FieldPoint, t: f64) -> FieldPoint {
        FieldPoint::new(self.x + (other.x - self.x) * t, self.y + (other.y - self.y) * t)
    }
}

/// Bases in running order. `Home` is both the batter's origin and the
/// scoring destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Base {
    Home,
    First,
    Second,
    Third,
    /// Home plate as a destination (a run)
    Scored,
}

impl Base {
    /// Position along the base path in bases from home.
    pub fn index(self) -> u8 {
        match self {
            Base::Home => 0,
            Base::First => 1,
            Base::Second => 2,
            Base::Third => 3,
            Base::Scored => 4,
        }
    }

    pub fn from_index(i: u8) -> Option<Base> {
        match i {
            0 => Some(Base::Home),
            1 => Some(Base::First),
            2 => Some(Base::Second),
            3 => Some(Base::Third),
            4 => Some(Base::Scored),
            _ => None,
        }
    }

    pub fn next(self) -> Option<Base> {
        Base::from_index(self.index() + 1)
    }

    pub fn previous(self) -> Option<Base> {
        self.index().checked_sub(1).and_then(Base::from_index)
    }

    /// Bag location. `Home` and `Scored` share the plate.
    pub fn location(self) -> FieldPoint {
        let d = field::BASE_PATH_FT / std::f64::consts::SQRT_2;
        match self {
            Base::Home | Base::Scored => FieldPoint::HOME,
            Base::First => FieldPoint::new(d, d),
            Base::Second => FieldPoint::new(0.0, 2.0 * d),
            Base::Third => FieldPoint::new(-d, d),
        }
    }

    /// Occupiable bases (`First`, `Second`, `Third`) as slot indices 0..3.
    pub fn slot(self) -> Option<usize> {
        match self {
            Base::First => Some(0),
            Base::Second => Some(1),
            Base::Third => Some(2),
            _ => None,
        }
    }

    pub const OCCUPIABLE: [Base; 3] = [Base::First, Base::Second, Base::Third];
}

/// The nine defensive positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DefensivePosition {
    Pitcher,
    Catcher,
    FirstBase,
    SecondBase,
    ThirdBase,
    Shortstop,
    LeftField,
    CenterField,
    RightField,
}

impl DefensivePosition {
    pub const ALL: [DefensivePosition; 9] = [
        DefensivePosition::Pitcher,
        DefensivePosition::Catcher,
        DefensivePosition::FirstBase,
        DefensivePosition::SecondBase,
        DefensivePosition::ThirdBase,
        DefensivePosition::Shortstop,
        DefensivePosition::LeftField,
        DefensivePosition::CenterField,
        DefensivePosition::RightField,
    ];

    /// Standard alignment, no shift.
    pub fn default_location(self) -> FieldPoint {
        match self {
            DefensivePosition::Pitcher => FieldPoint::new(0.0, 60.5),
            DefensivePosition::Catcher => FieldPoint::new(0.0, -2.5),
            DefensivePosition::FirstBase => FieldPoint::new(68.0, 82.0),
            DefensivePosition::SecondBase => FieldPoint::new(38.0, 142.0),
            DefensivePosition::Shortstop => FieldPoint::new(-38.0, 142.0),
            DefensivePosition::ThirdBase => FieldPoint::new(-66.0, 80.0),
            DefensivePosition::LeftField => FieldPoint::new(-185.0, 245.0),
            DefensivePosition::CenterField => FieldPoint::new(0.0, 315.0),
            DefensivePosition::RightField => FieldPoint::new(185.0, 245.0),
        }
    }

    pub fn is_outfielder(self) -> bool {
        matches!(
            self,
            DefensivePosition::LeftField | DefensivePosition::CenterField | DefensivePosition::RightField
        )
    }

    pub fn is_infielder(self) -> bool {
        !self.is_outfielder()
    }

    /// Who covers a bag on a force or relay.
    pub fn covering(base: Base) -> DefensivePosition {
        match base {
            Base::First => DefensivePosition::FirstBase,
            Base::Second => DefensivePosition::SecondBase,
            Base::Third => DefensivePosition::ThirdBase,
            Base::Home | Base::Scored => DefensivePosition::Catcher,
        }
    }
}

/// Fair territory: within the foul lines, degrees from centre.
pub fn is_fair_spray(spray_deg: f64) -> bool {
    spray_deg.abs() <= field::FOUL_LINE_DEG
}

/// Fence distance (ft) at a spray angle, linear between the lines, the gaps
/// and centre.
pub fn fence_distance_ft(spray_deg: f64) -> f64 {
    let a = spray_deg.abs().min(field::FOUL_LINE_DEG);
    let gap = field::FOUL_LINE_DEG / 2.0;
    if a <= gap {
        field::FENCE_CENTER_FT + (field::FENCE_GAP_FT - field::FENCE_CENTER_FT) * (a / gap)
    } else {
        field::FENCE_GAP_FT + (field::FENCE_LINE_FT - field::FENCE_GAP_FT) * ((a - gap) / gap)
    }
}
