//! Simulation configuration
//!
//! [`SimulationConfig`] describes a decumulation run and [`AccumulationConfig`]
//! a contribution run. All rates are fractions (0.08 = 8%); callers that
//! collect percentages must normalize them first. Both records are validated
//! before any simulation work starts.
//!
//! # Builder DSL
//!
//! ```ignore
//! use retireplan_core::config::SimulationBuilder;
//!
//! let config = SimulationBuilder::new()
//!     .initial_capital(1_000_000.0)
//!     .withdrawal_amount(40_000.0)
//!     .normal_returns(0.06, 0.12)
//!     .inflation(0.02)
//!     .guyton_klinger()
//!     .years(30)
//!     .paths(5_000)
//!     .seed(42)
//!     .build()?;
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::{ReturnModel, WithdrawalPolicy, WithdrawalSpec};

pub mod builder;

pub use builder::SimulationBuilder;

/// Longest horizon a single path may run, in periods
pub const MAX_PERIODS: usize = 10_000;

fn default_initial_capital() -> f64 {
    1_000_000.0
}

fn default_inflation() -> f64 {
    0.02
}

fn default_true() -> bool {
    true
}

fn default_years() -> usize {
    30
}

fn default_num_paths() -> usize {
    1_000
}

fn default_percentiles() -> Vec<f64> {
    vec![0.25, 0.50, 0.75]
}

fn default_max_years() -> u32 {
    50
}

fn default_periods_per_year() -> u32 {
    12
}

/// Decumulation run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    // === Your Situation ===
    /// Capital at the start of decumulation
    #[serde(default = "default_initial_capital")]
    pub initial_capital: f64,

    // === Your Plan ===
    /// First-period withdrawal, as a rate of capital or a fixed amount
    #[serde(default)]
    pub withdrawal: WithdrawalSpec,

    /// Rule that adjusts the withdrawal from period to period
    #[serde(default)]
    pub policy: WithdrawalPolicy,

    /// Number of annual periods to simulate
    #[serde(default = "default_years")]
    pub years: usize,

    // === World Assumptions ===
    /// Annual nominal return model
    #[serde(default)]
    pub returns: ReturnModel,

    /// Annual inflation rate
    #[serde(default = "default_inflation")]
    pub inflation: f64,

    /// Convert each nominal draw into a real return before applying it.
    ///
    /// When false, nominal returns are applied directly. Withdrawal indexing
    /// uses `inflation` either way.
    #[serde(default = "default_true")]
    pub deflate_returns: bool,

    // === Run Settings ===
    #[serde(default = "default_num_paths")]
    pub num_paths: usize,

    /// Fixed seed for reproducible runs (`None` draws a fresh seed)
    #[serde(default)]
    pub seed: Option<u64>,

    /// Terminal-value percentiles to report representative paths for
    #[serde(default = "default_percentiles")]
    pub percentiles: Vec<f64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_capital: default_initial_capital(),
            withdrawal: WithdrawalSpec::default(),
            policy: WithdrawalPolicy::default(),
            years: default_years(),
            returns: ReturnModel::default(),
            inflation: default_inflation(),
            deflate_returns: true,
            num_paths: default_num_paths(),
            seed: None,
            percentiles: default_percentiles(),
        }
    }
}

impl SimulationConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check every field; no simulation runs on an invalid config
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_paths == 0 {
            return Err(ConfigError::NoPaths);
        }
        if self.years == 0 {
            return Err(ConfigError::EmptyHorizon);
        }
        if self.years > MAX_PERIODS {
            return Err(ConfigError::HorizonTooLong {
                periods: self.years,
                max: MAX_PERIODS,
            });
        }
        if !self.initial_capital.is_finite() {
            return Err(ConfigError::NonFinite("initial capital"));
        }
        if self.initial_capital < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "initial capital",
                value: self.initial_capital,
                reason: "capital must be non-negative",
            });
        }
        validate_inflation(self.inflation)?;
        self.returns.validate()?;
        self.withdrawal.validate(self.initial_capital)?;
        self.policy.validate()?;
        for &p in &self.percentiles {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::OutOfRange {
                    field: "percentile",
                    value: p,
                    reason: "percentiles are fractions in [0, 1]",
                });
            }
        }
        Ok(())
    }

    /// First-period withdrawal amount
    #[must_use]
    pub fn initial_withdrawal(&self) -> f64 {
        self.withdrawal.initial_amount(self.initial_capital)
    }

    // === Variant Helpers ===

    /// Create a variant starting from a different capital
    #[must_use]
    pub fn with_initial_capital(&self, capital: f64) -> Self {
        let mut config = self.clone();
        config.initial_capital = capital;
        config
    }

    #[must_use]
    pub fn with_seed(&self, seed: Option<u64>) -> Self {
        let mut config = self.clone();
        config.seed = seed;
        config
    }

    #[must_use]
    pub fn with_num_paths(&self, num_paths: usize) -> Self {
        let mut config = self.clone();
        config.num_paths = num_paths;
        config
    }
}

/// Accumulation run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccumulationConfig {
    /// Amount added at the start of every period
    pub contribution: f64,

    /// Annual return model; converted to the period scale before sampling
    #[serde(default)]
    pub returns: ReturnModel,

    /// Wealth that ends a path as soon as it is reached
    pub target: f64,

    #[serde(default)]
    pub initial_principal: f64,

    #[serde(default = "default_max_years")]
    pub max_years: u32,

    /// Contribution periods per year (12 = monthly)
    #[serde(default = "default_periods_per_year")]
    pub periods_per_year: u32,

    #[serde(default = "default_num_paths")]
    pub num_paths: usize,

    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for AccumulationConfig {
    fn default() -> Self {
        Self {
            contribution: 1_000.0,
            returns: ReturnModel::default(),
            target: 1_000_000.0,
            initial_principal: 0.0,
            max_years: default_max_years(),
            periods_per_year: default_periods_per_year(),
            num_paths: default_num_paths(),
            seed: None,
        }
    }
}

impl AccumulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_paths == 0 {
            return Err(ConfigError::NoPaths);
        }
        if self.max_years == 0 {
            return Err(ConfigError::EmptyHorizon);
        }
        if self.periods_per_year == 0 {
            return Err(ConfigError::NoPeriodsPerYear);
        }
        if self.max_periods() > MAX_PERIODS {
            return Err(ConfigError::HorizonTooLong {
                periods: self.max_periods(),
                max: MAX_PERIODS,
            });
        }
        for (field, value) in [
            ("contribution", self.contribution),
            ("target", self.target),
            ("initial principal", self.initial_principal),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite(field));
            }
            if value < 0.0 {
                return Err(ConfigError::OutOfRange {
                    field,
                    value,
                    reason: "must be non-negative",
                });
            }
        }
        if self.target == 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "target",
                value: self.target,
                reason: "target wealth must be positive",
            });
        }
        self.returns.validate()
    }

    /// Period limit for one path
    #[must_use]
    pub fn max_periods(&self) -> usize {
        self.max_years as usize * self.periods_per_year as usize
    }
}

pub(crate) fn validate_inflation(inflation: f64) -> Result<(), ConfigError> {
    if !inflation.is_finite() {
        return Err(ConfigError::NonFinite("inflation"));
    }
    if inflation <= -1.0 {
        return Err(ConfigError::OutOfRange {
            field: "inflation",
            value: inflation,
            reason: "inflation must be greater than -100%",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
        assert!(AccumulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_decumulation_configs() {
        let base = SimulationConfig::default();

        let mut config = base.clone();
        config.num_paths = 0;
        assert_eq!(config.validate(), Err(ConfigError::NoPaths));

        let mut config = base.clone();
        config.years = 0;
        assert_eq!(config.validate(), Err(ConfigError::EmptyHorizon));

        let mut config = base.clone();
        config.years = usize::MAX;
        assert_eq!(
            config.validate(),
            Err(ConfigError::HorizonTooLong {
                periods: usize::MAX,
                max: MAX_PERIODS,
            })
        );

        let mut config = base.clone();
        config.years = MAX_PERIODS;
        assert!(config.validate().is_ok());

        let mut config = base.clone();
        config.returns = ReturnModel::Normal {
            mean: 0.05,
            std_dev: -0.01,
        };
        assert_eq!(config.validate(), Err(ConfigError::NegativeVolatility(-0.01)));

        let config = base.with_initial_capital(0.0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroCapitalWithRateWithdrawal)
        );

        let mut config = base.clone();
        config.inflation = f64::NAN;
        assert_eq!(config.validate(), Err(ConfigError::NonFinite("inflation")));

        let mut config = base;
        config.percentiles = vec![0.5, 95.0];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_capital_with_amount_is_valid() {
        let mut config = SimulationConfig::default().with_initial_capital(0.0);
        config.withdrawal = WithdrawalSpec::Amount(40_000.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_accumulation_configs() {
        let base = AccumulationConfig::default();

        let mut config = base.clone();
        config.num_paths = 0;
        assert_eq!(config.validate(), Err(ConfigError::NoPaths));

        let mut config = base.clone();
        config.max_years = 0;
        assert_eq!(config.validate(), Err(ConfigError::EmptyHorizon));

        let mut config = base.clone();
        config.periods_per_year = 0;
        assert_eq!(config.validate(), Err(ConfigError::NoPeriodsPerYear));

        // 1,000 years of monthly periods
        let mut config = base.clone();
        config.max_years = 1_000;
        assert_eq!(
            config.validate(),
            Err(ConfigError::HorizonTooLong {
                periods: 12_000,
                max: MAX_PERIODS,
            })
        );

        let mut config = base;
        config.target = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: SimulationConfig = serde_json::from_str(
            r#"{
                "initial_capital": 500000.0,
                "withdrawal": { "type": "Amount", "value": 20000.0 },
                "policy": { "type": "GuytonKlinger", "band": 0.25 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.initial_capital, 500_000.0);
        assert_eq!(config.withdrawal, WithdrawalSpec::Amount(20_000.0));
        assert_eq!(config.years, 30);
        assert!(config.deflate_returns);
        assert_eq!(config.percentiles, vec![0.25, 0.5, 0.75]);
        match config.policy {
            WithdrawalPolicy::GuytonKlinger(rules) => {
                assert_eq!(rules.band, 0.25);
                assert_eq!(rules.raise, 0.1);
                assert_eq!(rules.cut, 0.1);
            }
            WithdrawalPolicy::Fixed => panic!("expected guyton-klinger policy"),
        }
    }
}
