//! Baserunners and base occupancy.

use serde::{Deserialize, Serialize};

use super::attributes::{RunnerAttributes, RunnerProfile};
use super::field::Base;
use crate::error::{Result, SimError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseRunner {
    pub id: u32,
    pub base: Base,
    pub attributes: RunnerAttributes,
}

impl BaseRunner {
    pub fn new(id: u32, base: Base, attributes: RunnerAttributes) -> Self {
        Self { id, base, attributes }
    }

    /// The batter, standing at home.
    pub fn batter(id: u32, attributes: RunnerAttributes) -> Self {
        Self::new(id, Base::Home, attributes)
    }

    pub fn profile(&self) -> RunnerProfile {
        self.attributes.profile()
    }
}

/// Who is on first, second and third.
///
/// Placement never overwrites: putting a runner on an occupied base is a
/// broken contract, not a play outcome.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BaseState {
    slots: [Option<BaseRunner>; 3],
}

impl BaseState {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Put `runner` on `runner.base`.
    pub fn place(&mut self, runner: BaseRunner) -> Result<()> {
        let Some(slot) = runner.base.slot() else {
            return Err(SimError::InvariantViolation(format!(
                "runner {} cannot occupy {:?}",
                runner.id, runner.base
            )));
        };
        if let Some(existing) = &self.slots[slot] {
            let msg = format!(
                "runner {} placed on {:?} already held by runner {}",
                runner.id, runner.base, existing.id
            );
            #[cfg(feature = "strict_contracts")]
            panic!("STRICT: {msg}");
            #[cfg(not(feature = "strict_contracts"))]
            return Err(SimError::InvariantViolation(msg));
        }
        self.slots[slot] = Some(runner);
        Ok(())
    }

    pub fn take(&mut self, base: Base) -> Option<BaseRunner> {
        base.slot().and_then(|s| self.slots[s].take())
    }

    pub fn get(&self, base: Base) -> Option<&BaseRunner> {
        base.slot().and_then(|s| self.slots[s].as_ref())
    }

    pub fn is_occupied(&self, base: Base) -> bool {
        self.get(base).is_some()
    }

    pub fn count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Runners from third back to first.
    pub fn lead_first(&self) -> impl Iterator<Item = &BaseRunner> {
        self.slots.iter().rev().flatten()
    }

    /// Bases whose runners must advance. Only the batter starts a force.
    pub fn forced_runners(&self, batter_running: bool) -> Vec<Base> {
        let mut forced = Vec::new();
        if !batter_running {
            return forced;
        }
        for base in Base::OCCUPIABLE {
            if self.is_occupied(base) {
                forced.push(base);
            } else {
                break;
            }
        }
        forced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner(id: u32, base: Base) -> BaseRunner {
        BaseRunner::new(id, base, RunnerAttributes::default())
    }

    #[test]
    fn test_place_and_take() {
        let mut b = BaseState::empty();
        b.place(runner(1, Base::Second)).unwrap();
        assert!(b.is_occupied(Base::Second));
        assert_eq!(b.count(), 1);
        assert_eq!(b.take(Base::Second).map(|r| r.id), Some(1));
        assert!(b.is_empty());
    }

    #[test]
    fn test_home_is_not_a_slot() {
        let mut b = BaseState::empty();
        assert!(matches!(b.place(runner(1, Base::Home)), Err(SimError::InvariantViolation(_))));
        assert!(matches!(b.place(runner(1, Base::Scored)), Err(SimError::InvariantViolation(_))));
    }

    #[cfg(not(feature = "strict_contracts"))]
    #[test]
    fn test_refuses_to_overwrite() {
        let mut b = BaseState::empty();
        b.place(runner(1, Base::First)).unwrap();
        let err = b.place(runner(2, Base::First)).unwrap_err();
        assert!(err.is_caller_bug());
        assert_eq!(b.get(Base::First).map(|r| r.id), Some(1));
    }

    #[test]
    fn test_force_chain() {
        let mut b = BaseState::empty();
        b.place(runner(1, Base::First)).unwrap();
        b.place(runner(3, Base::Third)).unwrap();
        assert_eq!(b.forced_runners(true), vec![Base::First]);
        b.place(runner(2, Base::Second)).unwrap();
        assert_eq!(b.forced_runners(true), vec![Base::First, Base::Second, Base::Third]);
        assert!(b.forced_runners(false).is_empty());
    }

    #[test]
    fn test_lead_first_order() {
        let mut b = BaseState::empty();
        b.place(runner(1, Base::First)).unwrap();
        b.place(runner(3, Base::Third)).unwrap();
        let ids: Vec<u32> = b.lead_first().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }
}
