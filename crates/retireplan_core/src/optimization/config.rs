//! Capital search configuration

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Bounds and stopping rules for [`solve_initial_capital`](super::solve_initial_capital)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Success rate the capital must reach, as a fraction (0.95 = 95%)
    #[serde(default = "default_target_success_rate")]
    pub target_success_rate: f64,

    /// Lower end of the search interval
    #[serde(default)]
    pub low: f64,

    /// Upper end of the search interval
    #[serde(default = "default_high")]
    pub high: f64,

    /// Stop once the bracket is no wider than this (currency units)
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Maximum bisection steps, not counting the bound and final evaluations
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

fn default_target_success_rate() -> f64 {
    0.95
}

fn default_high() -> f64 {
    10_000_000.0
}

fn default_tolerance() -> f64 {
    100.0
}

fn default_max_iterations() -> usize {
    100
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            target_success_rate: default_target_success_rate(),
            low: 0.0,
            high: default_high(),
            tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
        }
    }
}

impl SolverConfig {
    #[must_use]
    pub fn new(target_success_rate: f64, low: f64, high: f64) -> Self {
        Self {
            target_success_rate,
            low,
            high,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.target_success_rate.is_finite() {
            return Err(ConfigError::NonFinite("target success rate"));
        }
        if !(0.0..=1.0).contains(&self.target_success_rate) {
            return Err(ConfigError::OutOfRange {
                field: "target success rate",
                value: self.target_success_rate,
                reason: "success rates are fractions in [0, 1]",
            });
        }
        let bounds_ok = self.low.is_finite()
            && self.high.is_finite()
            && self.low >= 0.0
            && self.high > self.low
            && self.tolerance.is_finite()
            && self.tolerance > 0.0;
        if !bounds_ok {
            return Err(ConfigError::InvalidBounds {
                low: self.low,
                high: self.high,
            });
        }
        Ok(())
    }
}
