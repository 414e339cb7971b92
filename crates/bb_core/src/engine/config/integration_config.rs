//! Integrator configuration

use serde::{Deserialize, Serialize};

use crate::engine::physics_constants::integration;
use crate::error::{Result, SimError};

/// Which step size the integrator uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum IntegrationMode {
    /// `dt` (default 1 ms)
    #[default]
    Accurate,
    /// `fast_dt` (default 2 ms), for bulk simulation
    Fast,
}

/// Whether intermediate samples are kept on the trajectory result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SampleRetention {
    #[default]
    Full,
    SummaryOnly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrationConfig {
    /// Step size in Accurate mode (s) (default: 0.001)
    pub dt: f64,
    /// Step size in Fast mode (s) (default: 0.002)
    pub fast_dt: f64,
    pub mode: IntegrationMode,
    /// Hard cap on simulated flight time (s) (default: 10.0)
    pub max_time_s: f64,
    #[serde(default)]
    pub retention: SampleRetention,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            dt: integration::DEFAULT_DT,
            fast_dt: integration::FAST_DT,
            mode: IntegrationMode::Accurate,
            max_time_s: integration::MAX_FLIGHT_TIME,
            retention: SampleRetention::Full,
        }
    }
}

impl IntegrationConfig {
    /// Step size for the active mode.
    pub fn step(&self) -> f64 {
        match self.mode {
            IntegrationMode::Accurate => self.dt,
            IntegrationMode::Fast => self.fast_dt,
        }
    }

    /// Number of steps allowed before the integrator reports divergence.
    pub fn step_budget(&self) -> usize {
        (self.max_time_s / self.step()).ceil() as usize
    }

    pub fn validate(&self) -> Result<()> {
        for (field, value) in [("dt", self.dt), ("fast_dt", self.fast_dt)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SimError::config(field, format!("must be positive, got {value}")));
            }
        }
        if !self.max_time_s.is_finite() || self.max_time_s <= 0.0 {
            return Err(SimError::config(
                "max_time_s",
                format!("must be positive, got {}", self.max_time_s),
            ));
        }
        if self.step() > self.max_time_s {
            return Err(SimError::config("dt", "step larger than max_time_s"));
        }
        Ok(())
    }
}
