use std::fmt;

/// Errors raised while validating a configuration, before any simulation work
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Path count must be at least one
    NoPaths,
    /// Horizon (decumulation years or accumulation max years) must be at least one
    EmptyHorizon,
    /// Horizon exceeds the supported number of periods
    HorizonTooLong { periods: usize, max: usize },
    /// Periods per year must be at least one
    NoPeriodsPerYear,
    NegativeVolatility(f64),
    /// A rate-based withdrawal needs a positive starting balance to resolve an amount
    ZeroCapitalWithRateWithdrawal,
    /// A numeric input was NaN or infinite
    NonFinite(&'static str),
    /// A numeric input was outside its allowed range
    OutOfRange {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },
    /// Solver bounds are inverted, negative, or the tolerance is not positive
    InvalidBounds { low: f64, high: f64 },
    /// The capital solver needs a fixed withdrawal amount
    RateWithdrawalInSolver,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoPaths => write!(f, "path count must be at least 1"),
            ConfigError::EmptyHorizon => write!(f, "horizon must be at least 1 period"),
            ConfigError::HorizonTooLong { periods, max } => {
                write!(f, "horizon of {periods} periods exceeds the limit of {max}")
            }
            ConfigError::NoPeriodsPerYear => write!(f, "periods per year must be at least 1"),
            ConfigError::NegativeVolatility(v) => {
                write!(f, "return volatility must be non-negative (got {v})")
            }
            ConfigError::ZeroCapitalWithRateWithdrawal => write!(
                f,
                "initial capital must be positive when withdrawals are given as a rate"
            ),
            ConfigError::NonFinite(field) => write!(f, "{field} must be a finite number"),
            ConfigError::OutOfRange {
                field,
                value,
                reason,
            } => write!(f, "{field} out of range (got {value}): {reason}"),
            ConfigError::InvalidBounds { low, high } => {
                write!(f, "invalid solver bounds [{low}, {high}]")
            }
            ConfigError::RateWithdrawalInSolver => write!(
                f,
                "capital search requires a fixed withdrawal amount, not a rate"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors returned by the simulation entry points
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    Config(ConfigError),
    /// Run was cancelled through its progress handle
    Cancelled,
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::Config(e) => write!(f, "invalid configuration: {e}"),
            SimulationError::Cancelled => write!(f, "simulation cancelled"),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Config(e) => Some(e),
            SimulationError::Cancelled => None,
        }
    }
}

impl From<ConfigError> for SimulationError {
    fn from(e: ConfigError) -> Self {
        SimulationError::Config(e)
    }
}

pub type Result<T> = std::result::Result<T, SimulationError>;
