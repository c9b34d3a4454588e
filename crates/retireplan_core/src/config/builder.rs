//! Simulation Builder
//!
//! Fluent construction of a [`SimulationConfig`] with validation on `build()`.

use super::SimulationConfig;
use crate::error::ConfigError;
use crate::model::{GuytonKlingerRules, ReturnModel, WithdrawalPolicy, WithdrawalSpec};

/// Builder for decumulation configurations
#[derive(Debug, Clone, Default)]
pub struct SimulationBuilder {
    config: SimulationConfig,
}

impl SimulationBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn initial_capital(mut self, capital: f64) -> Self {
        self.config.initial_capital = capital;
        self
    }

    /// Withdraw `rate` of the initial capital in the first period
    #[must_use]
    pub fn withdrawal_rate(mut self, rate: f64) -> Self {
        self.config.withdrawal = WithdrawalSpec::Rate(rate);
        self
    }

    /// Withdraw a fixed `amount` in the first period
    #[must_use]
    pub fn withdrawal_amount(mut self, amount: f64) -> Self {
        self.config.withdrawal = WithdrawalSpec::Amount(amount);
        self
    }

    #[must_use]
    pub fn fixed_return(mut self, rate: f64) -> Self {
        self.config.returns = ReturnModel::Fixed { rate };
        self
    }

    #[must_use]
    pub fn normal_returns(mut self, mean: f64, std_dev: f64) -> Self {
        self.config.returns = ReturnModel::Normal { mean, std_dev };
        self
    }

    #[must_use]
    pub fn inflation(mut self, inflation: f64) -> Self {
        self.config.inflation = inflation;
        self
    }

    #[must_use]
    pub fn deflate_returns(mut self, deflate: bool) -> Self {
        self.config.deflate_returns = deflate;
        self
    }

    #[must_use]
    pub fn fixed_policy(mut self) -> Self {
        self.config.policy = WithdrawalPolicy::Fixed;
        self
    }

    /// Guyton-Klinger with the standard ±20% band and 10% adjustments
    #[must_use]
    pub fn guyton_klinger(self) -> Self {
        self.guyton_klinger_with(GuytonKlingerRules::default())
    }

    #[must_use]
    pub fn guyton_klinger_with(mut self, rules: GuytonKlingerRules) -> Self {
        self.config.policy = WithdrawalPolicy::GuytonKlinger(rules);
        self
    }

    #[must_use]
    pub fn years(mut self, years: usize) -> Self {
        self.config.years = years;
        self
    }

    #[must_use]
    pub fn paths(mut self, num_paths: usize) -> Self {
        self.config.num_paths = num_paths;
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn percentiles(mut self, percentiles: Vec<f64>) -> Self {
        self.config.percentiles = percentiles;
        self
    }

    /// Validate and return the configuration
    pub fn build(self) -> Result<SimulationConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
