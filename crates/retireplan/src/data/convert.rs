use retireplan_core::{
    config::{AccumulationConfig, SimulationConfig},
    error::ConfigError,
    model::{GuytonKlingerRules, ReturnModel, WithdrawalPolicy, WithdrawalSpec},
    optimization::SolverConfig,
    projection::ProjectionConfig,
};

use super::scenario_data::{PolicyData, ScenarioData};

const ACCUMULATION_PERIODS_PER_YEAR: u32 = 12;

#[derive(Debug, Clone, PartialEq)]
pub enum ConvertError {
    /// Both `withdrawal_rate` and `withdrawal_amount` were set
    ConflictingWithdrawal,
    Invalid(ConfigError),
}

impl std::fmt::Display for ConvertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConvertError::ConflictingWithdrawal => write!(
                f,
                "set either withdrawal_rate or withdrawal_amount, not both"
            ),
            ConvertError::Invalid(e) => write!(f, "invalid scenario: {e}"),
        }
    }
}

impl std::error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConvertError::ConflictingWithdrawal => None,
            ConvertError::Invalid(e) => Some(e),
        }
    }
}

impl From<ConfigError> for ConvertError {
    fn from(e: ConfigError) -> Self {
        ConvertError::Invalid(e)
    }
}

fn percent(value: f64) -> f64 {
    value / 100.0
}

fn return_model(data: &ScenarioData) -> ReturnModel {
    ReturnModel::Normal {
        mean: percent(data.market.mean_return),
        std_dev: percent(data.market.volatility),
    }
}

/// Convert the saving phase to an engine config
pub fn to_accumulation_config(data: &ScenarioData) -> Result<AccumulationConfig, ConvertError> {
    let config = AccumulationConfig {
        contribution: data.accumulation.monthly_contribution,
        returns: return_model(data),
        target: data.accumulation.target,
        initial_principal: data.accumulation.initial_principal,
        max_years: data.accumulation.max_years,
        periods_per_year: ACCUMULATION_PERIODS_PER_YEAR,
        num_paths: data.simulation.paths,
        seed: data.simulation.seed,
    };
    config.validate()?;
    Ok(config)
}

fn withdrawal_spec(data: &ScenarioData) -> Result<WithdrawalSpec, ConvertError> {
    match (data.retirement.withdrawal_rate, data.retirement.withdrawal_amount) {
        (Some(_), Some(_)) => Err(ConvertError::ConflictingWithdrawal),
        (Some(rate), None) => Ok(WithdrawalSpec::Rate(percent(rate))),
        (None, Some(amount)) => Ok(WithdrawalSpec::Amount(amount)),
        (None, None) => Ok(WithdrawalSpec::default()),
    }
}

fn withdrawal_policy(data: &ScenarioData) -> WithdrawalPolicy {
    match data.retirement.policy {
        PolicyData::Fixed => WithdrawalPolicy::Fixed,
        PolicyData::GuytonKlinger => {
            let g = &data.retirement.guardrails;
            WithdrawalPolicy::GuytonKlinger(GuytonKlingerRules {
                band: percent(g.band),
                raise: percent(g.raise),
                cut: percent(g.cut),
            })
        }
    }
}

/// Convert the spending phase, starting from `capital`
pub fn to_simulation_config(
    data: &ScenarioData,
    capital: f64,
) -> Result<SimulationConfig, ConvertError> {
    let config = SimulationConfig {
        initial_capital: capital,
        withdrawal: withdrawal_spec(data)?,
        policy: withdrawal_policy(data),
        years: data.retirement.years,
        returns: return_model(data),
        inflation: percent(data.market.inflation),
        deflate_returns: data.market.deflate_returns,
        num_paths: data.simulation.paths,
        seed: data.simulation.seed,
        percentiles: data.simulation.percentiles.iter().copied().map(percent).collect(),
    };
    config.validate()?;
    Ok(config)
}

pub fn to_solver_config(data: &ScenarioData) -> Result<SolverConfig, ConvertError> {
    let config = SolverConfig {
        target_success_rate: percent(data.solver.target_success_rate),
        low: data.solver.low,
        high: data.solver.high,
        tolerance: data.solver.tolerance,
        max_iterations: data.solver.max_iterations,
    };
    config.validate()?;
    Ok(config)
}

/// Constant-return projection of the saving phase at the mean return
pub fn to_projection_config(data: &ScenarioData) -> Result<ProjectionConfig, ConvertError> {
    let config = ProjectionConfig {
        initial: data.accumulation.initial_principal,
        monthly_contribution: data.accumulation.monthly_contribution,
        annual_return: percent(data.market.mean_return),
        target: data.accumulation.target,
        max_years: 100,
    };
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentages_are_normalized() {
        let mut data = ScenarioData::default();
        data.retirement.withdrawal_rate = Some(4.0);
        data.retirement.policy = PolicyData::GuytonKlinger;

        let config = to_simulation_config(&data, 1_000_000.0).unwrap();

        assert_eq!(config.inflation, 0.02);
        assert_eq!(config.returns.mean(), 0.08);
        assert_eq!(config.returns.std_dev(), 0.16);
        assert_eq!(config.withdrawal, WithdrawalSpec::Rate(0.04));
        assert_eq!(config.percentiles, vec![0.25, 0.5, 0.75]);
        match config.policy {
            WithdrawalPolicy::GuytonKlinger(rules) => {
                assert_eq!(rules.band, 0.2);
                assert_eq!(rules.raise, 0.1);
            }
            WithdrawalPolicy::Fixed => panic!("expected guyton-klinger"),
        }
    }

    #[test]
    fn test_conflicting_withdrawal() {
        let mut data = ScenarioData::default();
        data.retirement.withdrawal_rate = Some(4.0);
        data.retirement.withdrawal_amount = Some(40_000.0);

        assert_eq!(
            to_simulation_config(&data, 1_000_000.0).unwrap_err(),
            ConvertError::ConflictingWithdrawal
        );
    }

    #[test]
    fn test_invalid_values_surface_core_errors() {
        let mut data = ScenarioData::default();
        data.simulation.paths = 0;
        assert_eq!(
            to_accumulation_config(&data).unwrap_err(),
            ConvertError::Invalid(ConfigError::NoPaths)
        );

        let mut data = ScenarioData::default();
        data.solver.high = -5.0;
        assert!(to_solver_config(&data).is_err());

        let mut data = ScenarioData::default();
        data.market.volatility = -1.0;
        assert!(to_simulation_config(&data, 1.0).is_err());
    }

    #[test]
    fn test_accumulation_is_monthly() {
        let config = to_accumulation_config(&ScenarioData::default()).unwrap();
        assert_eq!(config.periods_per_year, 12);
        assert_eq!(config.contribution, 5_000.0);
    }
}
