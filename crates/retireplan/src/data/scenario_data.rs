use std::path::Path;

use serde::{Deserialize, Serialize};

/// A complete plan in human-readable format.
///
/// Rates are written in percent (`8` means 8%) and converted to fractions
/// before they reach the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioData {
    #[serde(default)]
    pub market: MarketData,

    /// Saving phase
    #[serde(default)]
    pub accumulation: AccumulationData,

    /// Spending phase
    #[serde(default)]
    pub retirement: RetirementData,

    #[serde(default)]
    pub solver: SolverData,

    /// Path count, seed and reported percentiles
    #[serde(default)]
    pub simulation: RunData,
}

/// Market assumptions shared by both phases
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketData {
    /// Annual mean return (%)
    #[serde(default = "default_mean_return")]
    pub mean_return: f64,

    /// Annual return volatility (%)
    #[serde(default = "default_volatility")]
    pub volatility: f64,

    /// Annual inflation (%)
    #[serde(default = "default_inflation")]
    pub inflation: f64,

    /// Apply returns net of inflation during retirement
    #[serde(default = "default_true")]
    pub deflate_returns: bool,
}

fn default_mean_return() -> f64 {
    8.0
}

fn default_volatility() -> f64 {
    16.0
}

fn default_inflation() -> f64 {
    2.0
}

fn default_true() -> bool {
    true
}

impl Default for MarketData {
    fn default() -> Self {
        Self {
            mean_return: default_mean_return(),
            volatility: default_volatility(),
            inflation: default_inflation(),
            deflate_returns: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccumulationData {
    #[serde(default = "default_monthly_contribution")]
    pub monthly_contribution: f64,

    #[serde(default)]
    pub initial_principal: f64,

    /// Wealth to reach; also the retirement capital when none is given
    #[serde(default = "default_target")]
    pub target: f64,

    #[serde(default = "default_max_years")]
    pub max_years: u32,
}

fn default_monthly_contribution() -> f64 {
    5_000.0
}

fn default_target() -> f64 {
    1_000_000.0
}

fn default_max_years() -> u32 {
    50
}

impl Default for AccumulationData {
    fn default() -> Self {
        Self {
            monthly_contribution: default_monthly_contribution(),
            initial_principal: 0.0,
            target: default_target(),
            max_years: default_max_years(),
        }
    }
}

/// Withdrawal policy name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyData {
    #[default]
    Fixed,
    GuytonKlinger,
}

/// Guyton-Klinger guardrails (%)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardrailsData {
    #[serde(default = "default_band")]
    pub band: f64,
    #[serde(default = "default_adjustment")]
    pub raise: f64,
    #[serde(default = "default_adjustment")]
    pub cut: f64,
}

fn default_band() -> f64 {
    20.0
}

fn default_adjustment() -> f64 {
    10.0
}

impl Default for GuardrailsData {
    fn default() -> Self {
        Self {
            band: default_band(),
            raise: default_adjustment(),
            cut: default_adjustment(),
        }
    }
}

/// Withdrawals are given either as `withdrawal_rate` or `withdrawal_amount`, not both
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetirementData {
    /// Starting capital; falls back to the accumulation target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capital: Option<f64>,

    /// First-year withdrawal as a share of capital (%)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub withdrawal_rate: Option<f64>,

    /// First-year withdrawal in currency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub withdrawal_amount: Option<f64>,

    #[serde(default = "default_years")]
    pub years: usize,

    #[serde(default)]
    pub policy: PolicyData,

    #[serde(default)]
    pub guardrails: GuardrailsData,
}

fn default_years() -> usize {
    30
}

impl Default for RetirementData {
    fn default() -> Self {
        Self {
            capital: None,
            withdrawal_rate: None,
            withdrawal_amount: None,
            years: default_years(),
            policy: PolicyData::Fixed,
            guardrails: GuardrailsData::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverData {
    /// Required success rate (%)
    #[serde(default = "default_target_success")]
    pub target_success_rate: f64,

    #[serde(default)]
    pub low: f64,

    #[serde(default = "default_high")]
    pub high: f64,

    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

fn default_target_success() -> f64 {
    95.0
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

impl Default for SolverData {
    fn default() -> Self {
        Self {
            target_success_rate: default_target_success(),
            low: 0.0,
            high: default_high(),
            tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunData {
    #[serde(default = "default_paths")]
    pub paths: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Terminal-value percentiles to report (%)
    #[serde(default = "default_percentiles")]
    pub percentiles: Vec<f64>,
}

fn default_paths() -> usize {
    1_000
}

fn default_percentiles() -> Vec<f64> {
    vec![25.0, 50.0, 75.0]
}

impl Default for RunData {
    fn default() -> Self {
        Self {
            paths: default_paths(),
            seed: None,
            percentiles: default_percentiles(),
        }
    }
}

impl ScenarioData {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_saphyr::Error> {
        serde_saphyr::from_str(yaml)
    }

    /// Save to YAML string
    pub fn to_yaml(&self) -> Result<String, serde_saphyr::ser::Error> {
        serde_saphyr::to_string(self)
    }

    /// Read a scenario file
    pub fn load(path: &Path) -> color_eyre::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let scenario = Self::from_yaml(&content)?;
        tracing::debug!(path = %path.display(), "loaded scenario");
        Ok(scenario)
    }

    /// Capital the retirement phase starts from
    #[must_use]
    pub fn retirement_capital(&self) -> f64 {
        self.retirement.capital.unwrap_or(self.accumulation.target)
    }
}
