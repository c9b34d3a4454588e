//! Deterministic savings projection at a constant return.
//!
//! A quick counterpart to the Monte Carlo accumulation run: the annual rate
//! is split evenly across twelve months, each month compounds the balance and
//! then adds the contribution.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const MONTHS_PER_YEAR: usize = 12;

fn default_max_years() -> usize {
    100
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    #[serde(default)]
    pub initial: f64,
    pub monthly_contribution: f64,
    /// Nominal annual rate; the monthly rate is `annual_return / 12`
    pub annual_return: f64,
    pub target: f64,
    #[serde(default = "default_max_years")]
    pub max_years: usize,
}

impl ProjectionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("initial principal", self.initial),
            ("contribution", self.monthly_contribution),
            ("return", self.annual_return),
            ("target", self.target),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite(field));
            }
        }
        if self.initial < 0.0 || self.monthly_contribution < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "contribution",
                value: self.initial.min(self.monthly_contribution),
                reason: "principal and contribution must be non-negative",
            });
        }
        if self.annual_return / MONTHS_PER_YEAR as f64 <= -1.0 {
            return Err(ConfigError::OutOfRange {
                field: "return",
                value: self.annual_return,
                reason: "the monthly rate must be greater than -100%",
            });
        }
        if self.target <= 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "target",
                value: self.target,
                reason: "target wealth must be positive",
            });
        }
        if self.max_years == 0 {
            return Err(ConfigError::EmptyHorizon);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    /// Whole months to the target expressed in years, `None` if never reached
    pub years_to_goal: Option<f64>,
    /// Balance at the start and after every completed year, including the
    /// year in which the projection stopped if it stopped on a year boundary
    pub yearly_balances: Vec<f64>,
}

/// Project a constant-return savings plan until the target or the year cap.
pub fn project_accumulation(config: &ProjectionConfig) -> Result<Projection, ConfigError> {
    config.validate()?;

    let monthly_rate = config.annual_return / MONTHS_PER_YEAR as f64;
    let max_months = config.max_years * MONTHS_PER_YEAR;

    let mut balance = config.initial;
    let mut months = 0;
    let mut yearly_balances = vec![balance];

    while balance < config.target && months < max_months {
        balance = balance * (1.0 + monthly_rate) + config.monthly_contribution;
        months += 1;
        if months % MONTHS_PER_YEAR == 0 {
            yearly_balances.push(balance);
        }
    }

    let years_to_goal =
        (balance >= config.target).then(|| months as f64 / MONTHS_PER_YEAR as f64);

    Ok(Projection {
        years_to_goal,
        yearly_balances,
    })
}
