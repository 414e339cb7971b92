//! # Simulation Configuration
//!
//! Integration knobs and the debug toggle, grouped so a caller can load a
//! single JSON blob and hand it to every simulation entry point.
//!
//! ## Usage
//! ```rust
//! use bb_core::engine::config::SimConfig;
//!
//! let config = SimConfig::default();
//! let fast = SimConfig::fast();
//! assert!(fast.validate().is_ok());
//! ```

mod integration_config;

pub use integration_config::{IntegrationConfig, IntegrationMode, SampleRetention};

use serde::{Deserialize, Serialize};

use crate::engine::physics_constants::integration;
use crate::error::Result;

/// Debug / metrics toggle. When disabled the core emits no tracing events.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct DebugConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SimConfig {
    pub integration: IntegrationConfig,
    #[serde(default)]
    pub debug: DebugConfig,
}

impl SimConfig {
    /// 1 ms RK4, full sample retention (default)
    pub fn accurate() -> Self {
        Self::default()
    }

    /// 2 ms RK4, summaries only
    pub fn fast() -> Self {
        let mut cfg = Self::default();
        cfg.integration.mode = IntegrationMode::Fast;
        cfg.integration.retention = SampleRetention::SummaryOnly;
        cfg
    }

    /// 0.5 ms RK4, for reference runs
    pub fn fine() -> Self {
        let mut cfg = Self::default();
        cfg.integration.dt = integration::FINE_DT;
        cfg
    }

    /// Test preset: accurate stepping, tracing on
    pub fn deterministic_test() -> Self {
        let mut cfg = Self::default();
        cfg.debug.enabled = true;
        cfg
    }

    pub fn validate(&self) -> Result<()> {
        self.integration.validate()
    }

    pub fn dt(&self) -> f64 {
        self.integration.step()
    }

    pub fn debug_enabled(&self) -> bool {
        self.debug.enabled
    }
}

// ========== Tests ==========

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;

    #[test]
    fn test_default_config() {
        let cfg = SimConfig::default();
        assert!((cfg.dt() - 0.001).abs() < 1e-12);
        assert!(!cfg.debug_enabled());
        assert_eq!(cfg.integration.retention, SampleRetention::Full);
        assert_eq!(cfg.integration.step_budget(), 10_000);
    }

    #[test]
    fn test_presets() {
        assert!((SimConfig::fast().dt() - 0.002).abs() < 1e-12);
        assert_eq!(SimConfig::fast().integration.retention, SampleRetention::SummaryOnly);
        assert!((SimConfig::fine().dt() - 0.0005).abs() < 1e-12);
        assert!(SimConfig::deterministic_test().debug_enabled());
        for cfg in [SimConfig::accurate(), SimConfig::fast(), SimConfig::fine()] {
            assert!(cfg.validate().is_ok());
        }
    }

    #[test]
    fn test_validate_rejects_bad_dt() {
        let mut cfg = SimConfig::default();
        cfg.integration.dt = 0.0;
        assert!(matches!(
            cfg.validate(),
            Err(SimError::Configuration { field: "dt", .. })
        ));

        cfg.integration.dt = f64::NAN;
        assert!(cfg.validate().is_err());

        let mut cfg = SimConfig::default();
        cfg.integration.max_time_s = -1.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_config_serialization() {
        let cfg = SimConfig::fast();
        let json = serde_json::to_string(&cfg).unwrap();
        let parsed: SimConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.integration.mode, IntegrationMode::Fast);
        assert!((parsed.dt() - cfg.dt()).abs() < 1e-12);
    }

    #[test]
    fn test_config_missing_debug_defaults() {
        let json = r#"{"integration":{"dt":0.001,"fast_dt":0.002,"mode":"Accurate","max_time_s":10.0}}"#;
        let parsed: SimConfig = serde_json::from_str(json).unwrap();
        assert!(!parsed.debug_enabled());
        assert_eq!(parsed.integration.retention, SampleRetention::Full);
    }
}
