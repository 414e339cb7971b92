use thiserror::Error;

/// Failure taxonomy for the simulation core.
///
/// Probabilistic outcomes (a dropped fly ball, a runner thrown out) are play
/// results, never errors. Every variant here is either bad caller input or a
/// broken internal contract.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid configuration for {field}: {reason}")]
    Configuration { field: &'static str, reason: String },

    #[error("Numerical divergence after {steps} steps (t = {time_s:.3}s)")]
    NumericalDivergence { steps: usize, time_s: f64 },

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

impl SimError {
    pub fn config(field: &'static str, reason: impl Into<String>) -> Self {
        SimError::Configuration { field, reason: reason.into() }
    }

    /// True when the failure was caused by the caller's inputs or by a bug,
    /// as opposed to a numerical blow-up that a smaller step might avoid.
    pub fn is_caller_bug(&self) -> bool {
        match self {
            SimError::Configuration { .. } => true,
            SimError::InvariantViolation(_) => true,
            SimError::NumericalDivergence { .. } => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;

/// Reject NaN/inf inputs with a `Configuration` error.
pub(crate) fn ensure_finite(field: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SimError::config(field, format!("must be finite, got {value}")))
    }
}
