//! Fielders and the nine-man defense.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use super::attributes::{FielderAttributes, FielderProfile};
use super::field::{DefensivePosition, FieldPoint};
use crate::engine::coordinates;
use crate::engine::fielding::{self, Intercept};
use crate::error::{Result, SimError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fielder {
    pub id: u32,
    pub position: DefensivePosition,
    pub location: FieldPoint,
    pub attributes: FielderAttributes,
}

impl Fielder {
    /// Fielder at the standard spot for `position`.
    pub fn new(id: u32, position: DefensivePosition, attributes: FielderAttributes) -> Self {
        Self { id, position, location: position.default_location(), attributes }
    }

    pub fn move_to(&mut self, point: FieldPoint) {
        self.location = point;
    }

    pub fn profile(&self) -> FielderProfile {
        self.attributes.profile()
    }

    /// Time to reach the ground point under a trajectory-frame position (m).
    pub fn time_to_reach_ground(&self, point: &Vector3<f64>) -> f64 {
        fielding::time_to_reach(self, &coordinates::ground_point(point))
    }
}

/// One fielder per defensive position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Defense {
    fielders: Vec<Fielder>,
}

impl Defense {
    pub fn new(fielders: Vec<Fielder>) -> Result<Self> {
        for pos in DefensivePosition::ALL {
            let count = fielders.iter().filter(|f| f.position == pos).count();
            if count != 1 {
                return Err(SimError::config("defense", format!("{count} fielders at {pos:?}")));
            }
        }
        if fielders.len() != DefensivePosition::ALL.len() {
            return Err(SimError::config("defense", format!("{} fielders, expected 9", fielders.len())));
        }
        Ok(Self { fielders })
    }

    /// Nine identical fielders in the standard alignment, ids 1..=9.
    pub fn uniform(attributes: FielderAttributes) -> Self {
        let fielders = DefensivePosition::ALL
            .iter()
            .zip(1u32..)
            .map(|(&pos, id)| Fielder::new(id, pos, attributes))
            .collect();
        Self { fielders }
    }

    pub fn get(&self, position: DefensivePosition) -> Option<&Fielder> {
        self.fielders.iter().find(|f| f.position == position)
    }

    pub fn get_mut(&mut self, position: DefensivePosition) -> Option<&mut Fielder> {
        self.fielders.iter_mut().find(|f| f.position == position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fielder> {
        self.fielders.iter()
    }

    /// Fielder who gets to `point` with the most time to spare before the
    /// ball arrives at `ball_time_s`, with their attempt.
    pub fn assign_fielder(&self, point: &FieldPoint, ball_time_s: f64) -> Option<(&Fielder, Intercept)> {
        self.fielders
            .iter()
            .map(|f| (f, fielding::air_ball_attempt(f, point, ball_time_s)))
            .max_by(|(_, a), (_, b)| a.margin_s().total_cmp(&b.margin_s()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::attribute_mapping::Rating;

    #[test]
    fn test_uniform_defense_covers_every_position() {
        let d = Defense::uniform(FielderAttributes::default());
        for pos in DefensivePosition::ALL {
            assert_eq!(d.get(pos).map(|f| f.location), Some(pos.default_location()));
        }
        assert!(Defense::new(d.iter().cloned().collect()).is_ok());
    }

    #[test]
    fn test_duplicate_position_rejected() {
        let mut fielders: Vec<Fielder> = Defense::uniform(FielderAttributes::default()).iter().cloned().collect();
        fielders[1].position = DefensivePosition::Pitcher;
        assert!(matches!(Defense::new(fielders), Err(SimError::Configuration { .. })));
    }

    #[test]
    fn test_assigns_nearest_outfielder() {
        let d = Defense::uniform(FielderAttributes::uniform(Rating::AVERAGE));
        let (f, attempt) = d.assign_fielder(&FieldPoint::new(-170.0, 260.0), 4.5).unwrap();
        assert_eq!(f.position, DefensivePosition::LeftField);
        assert!(attempt.margin_s() > 0.0);
        let (f, _) = d.assign_fielder(&FieldPoint::new(5.0, 330.0), 5.0).unwrap();
        assert_eq!(f.position, DefensivePosition::CenterField);
    }

    #[test]
    fn test_move_to() {
        let mut f = Fielder::new(7, DefensivePosition::Shortstop, FielderAttributes::default());
        f.move_to(FieldPoint::new(-10.0, 150.0));
        assert_eq!(f.location, FieldPoint::new(-10.0, 150.0));
        let t = f.time_to_reach_ground(&Vector3::new(150.0 * 0.3048, 10.0 * 0.3048, 5.0));
        assert!((t - f.profile().reaction_s).abs() < 1e-6);
    }
}
