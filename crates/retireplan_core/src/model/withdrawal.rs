//! Withdrawal policies for the decumulation phase
//!
//! A policy is chosen once per run. Each path owns a [`WithdrawalState`] that
//! is threaded through [`WithdrawalPolicy::step`] once per period, after the
//! period's return has been applied and before the withdrawal is taken.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How the first period's withdrawal is determined
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum WithdrawalSpec {
    /// Fraction of the initial capital (0.04 = 4% rule)
    Rate(f64),
    /// Absolute amount per period
    Amount(f64),
}

impl Default for WithdrawalSpec {
    fn default() -> Self {
        WithdrawalSpec::Rate(0.04)
    }
}

impl WithdrawalSpec {
    /// First-period withdrawal for a path starting at `initial_capital`
    #[must_use]
    pub fn initial_amount(&self, initial_capital: f64) -> f64 {
        match self {
            WithdrawalSpec::Rate(rate) => initial_capital * rate,
            WithdrawalSpec::Amount(amount) => *amount,
        }
    }

    pub fn validate(&self, initial_capital: f64) -> Result<(), ConfigError> {
        let (field, value) = match self {
            WithdrawalSpec::Rate(rate) => ("withdrawal rate", *rate),
            WithdrawalSpec::Amount(amount) => ("withdrawal amount", *amount),
        };
        if !value.is_finite() {
            return Err(ConfigError::NonFinite(field));
        }
        if value < 0.0 {
            return Err(ConfigError::OutOfRange {
                field,
                value,
                reason: "withdrawals must be non-negative",
            });
        }
        if matches!(self, WithdrawalSpec::Rate(_)) && initial_capital <= 0.0 {
            return Err(ConfigError::ZeroCapitalWithRateWithdrawal);
        }
        Ok(())
    }
}

/// Guardrail parameters for the Guyton-Klinger policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuytonKlingerRules {
    /// Relative distance from the base rate that triggers an adjustment (0.2 = ±20%)
    #[serde(default = "default_band")]
    pub band: f64,
    /// Prosperity raise applied when the current rate falls below the band
    #[serde(default = "default_adjustment")]
    pub raise: f64,
    /// Capital-preservation cut applied when the current rate exceeds the band
    #[serde(default = "default_adjustment")]
    pub cut: f64,
}

fn default_band() -> f64 {
    0.2
}

fn default_adjustment() -> f64 {
    0.1
}

impl Default for GuytonKlingerRules {
    fn default() -> Self {
        Self {
            band: default_band(),
            raise: default_adjustment(),
            cut: default_adjustment(),
        }
    }
}

impl GuytonKlingerRules {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("guardrail band", self.band),
            ("prosperity raise", self.raise),
            ("preservation cut", self.cut),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite(field));
            }
            if value < 0.0 {
                return Err(ConfigError::OutOfRange {
                    field,
                    value,
                    reason: "guardrail parameters must be non-negative",
                });
            }
        }
        if self.cut > 1.0 {
            return Err(ConfigError::OutOfRange {
                field: "preservation cut",
                value: self.cut,
                reason: "a cut above 100% would make withdrawals negative",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WithdrawalPolicy {
    /// Initial withdrawal grown by inflation every period
    #[default]
    Fixed,
    /// Inflation skipped after down markets, with prosperity and preservation guardrails
    GuytonKlinger(GuytonKlingerRules),
}

/// Per-path mutable policy state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WithdrawalState {
    /// Withdrawal decided for the most recent period (initial amount before the first step)
    pub withdrawal: f64,
    /// Withdrawal-to-assets ratio on day one
    pub base_rate: f64,
    /// Assets at the start of the upcoming period, before its return
    pub previous_assets: f64,
    /// Number of periods already stepped
    pub period: usize,
}

impl WithdrawalState {
    #[must_use]
    pub fn new(initial_withdrawal: f64, initial_assets: f64) -> Self {
        let base_rate = if initial_assets > 0.0 {
            initial_withdrawal / initial_assets
        } else {
            f64::INFINITY
        };
        Self {
            withdrawal: initial_withdrawal,
            base_rate,
            previous_assets: initial_assets,
            period: 0,
        }
    }
}

impl WithdrawalPolicy {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            WithdrawalPolicy::Fixed => Ok(()),
            WithdrawalPolicy::GuytonKlinger(rules) => rules.validate(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            WithdrawalPolicy::Fixed => "fixed",
            WithdrawalPolicy::GuytonKlinger(_) => "guyton-klinger",
        }
    }

    /// Decide this period's withdrawal.
    ///
    /// `assets_after_return` is the balance once the period's return has been
    /// applied. The returned state carries the withdrawal in `withdrawal` and
    /// the post-withdrawal balance (floored at zero) in `previous_assets`.
    #[must_use]
    pub fn step(
        &self,
        state: WithdrawalState,
        assets_after_return: f64,
        inflation: f64,
    ) -> WithdrawalState {
        let mut withdrawal = state.withdrawal;

        match self {
            WithdrawalPolicy::Fixed => {
                if state.period > 0 {
                    withdrawal *= 1.0 + inflation;
                }
            }
            WithdrawalPolicy::GuytonKlinger(rules) => {
                let market_up = assets_after_return > state.previous_assets;
                let threshold = rules.band * state.base_rate;

                if market_up {
                    // no "last year" to index against on the first withdrawal
                    if state.period > 0 {
                        withdrawal *= 1.0 + inflation;
                    }
                    if assets_after_return > 0.0
                        && withdrawal / assets_after_return - state.base_rate < -threshold
                    {
                        withdrawal *= 1.0 + rules.raise;
                    }
                } else if assets_after_return > 0.0
                    && withdrawal / assets_after_return - state.base_rate > threshold
                {
                    withdrawal *= 1.0 - rules.cut;
                }
            }
        }

        let withdrawal = withdrawal.max(0.0);
        WithdrawalState {
            withdrawal,
            base_rate: state.base_rate,
            previous_assets: (assets_after_return - withdrawal).max(0.0),
            period: state.period + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gk() -> WithdrawalPolicy {
        WithdrawalPolicy::GuytonKlinger(GuytonKlingerRules::default())
    }

    #[test]
    fn test_fixed_grows_with_inflation_after_first_period() {
        let policy = WithdrawalPolicy::Fixed;
        let mut state = WithdrawalState::new(40_000.0, 1_000_000.0);

        state = policy.step(state, 900_000.0, 0.03);
        assert_eq!(state.withdrawal, 40_000.0);

        state = policy.step(state, 100.0, 0.03);
        assert!((state.withdrawal - 41_200.0).abs() < 1e-9);
        assert_eq!(state.previous_assets, 0.0);
    }

    #[test]
    fn test_gk_first_period_skips_inflation() {
        let state = WithdrawalState::new(40_000.0, 1_000_000.0);
        let next = gk().step(state, 1_050_000.0, 0.05);

        assert_eq!(next.withdrawal, 40_000.0);
        assert_eq!(next.previous_assets, 1_010_000.0);
        assert_eq!(next.period, 1);
    }

    #[test]
    fn test_gk_inflates_after_up_market() {
        let mut state = WithdrawalState::new(40_000.0, 1_000_000.0);
        state.period = 3;
        let next = gk().step(state, 1_010_000.0, 0.02);
        assert!((next.withdrawal - 40_800.0).abs() < 1e-9);
    }

    #[test]
    fn test_gk_freezes_after_down_market() {
        let mut state = WithdrawalState::new(40_000.0, 1_000_000.0);
        state.period = 3;
        let next = gk().step(state, 950_000.0, 0.02);
        assert_eq!(next.withdrawal, 40_000.0);
    }

    #[test]
    fn test_gk_prosperity_raise() {
        // 40k / 1.5M = 2.67%, more than 20% below the 4% base rate
        let mut state = WithdrawalState::new(40_000.0, 1_000_000.0);
        state.period = 1;
        let next = gk().step(state, 1_500_000.0, 0.0);
        assert!((next.withdrawal - 44_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_gk_preservation_cut() {
        // 40k / 700k = 5.7%, more than 20% above the 4% base rate
        let mut state = WithdrawalState::new(40_000.0, 1_000_000.0);
        state.period = 1;
        let next = gk().step(state, 700_000.0, 0.03);
        assert!((next.withdrawal - 36_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_gk_custom_rules() {
        let policy = WithdrawalPolicy::GuytonKlinger(GuytonKlingerRules {
            band: 0.1,
            raise: 0.05,
            cut: 0.25,
        });
        let mut state = WithdrawalState::new(40_000.0, 1_000_000.0);
        state.period = 1;
        // 40k / 860k = 4.65%, outside a 10% band but inside the default 20%
        let next = policy.step(state, 860_000.0, 0.0);
        assert!((next.withdrawal - 30_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_gk_wiped_out_assets_do_not_divide_by_zero() {
        let state = WithdrawalState::new(40_000.0, 0.0);
        assert!(state.base_rate.is_infinite());

        let next = gk().step(state, 0.0, 0.02);
        assert_eq!(next.withdrawal, 40_000.0);
        assert_eq!(next.previous_assets, 0.0);
    }

    #[test]
    fn test_rate_spec_requires_capital() {
        assert_eq!(
            WithdrawalSpec::Rate(0.04).validate(0.0),
            Err(ConfigError::ZeroCapitalWithRateWithdrawal)
        );
        assert!(WithdrawalSpec::Amount(40_000.0).validate(0.0).is_ok());
        assert_eq!(WithdrawalSpec::Rate(0.04).initial_amount(500_000.0), 20_000.0);
    }

    #[test]
    fn test_rules_reject_oversized_cut() {
        let rules = GuytonKlingerRules {
            cut: 1.5,
            ..Default::default()
        };
        assert!(rules.validate().is_err());
    }
}
