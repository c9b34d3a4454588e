//! Simulation outputs
//!
//! Per-path records produced by the simulators and the reduced summaries
//! built from them.

use serde::{Deserialize, Serialize};

/// One simulated decumulation trajectory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecumulationPath {
    /// End-of-period balances, `assets[0]` is the initial capital.
    /// Length is `years + 1`; entries after ruin are zero.
    pub assets: Vec<f64>,
    /// Withdrawal decided in each period; entries after ruin are zero.
    pub withdrawals: Vec<f64>,
    /// 1-based period in which assets reached zero, if they did
    pub ruin_period: Option<usize>,
    /// Sum of the withdrawals actually decided on this path
    pub total_withdrawn: f64,
}

impl DecumulationPath {
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.ruin_period.is_none()
    }

    /// Periods the money lasted (and withdrawals were taken): the ruin period, or the full horizon
    #[must_use]
    pub fn years_survived(&self) -> usize {
        self.ruin_period.unwrap_or(self.withdrawals.len())
    }

    /// Last strictly positive balance on the path, or zero if there is none
    #[must_use]
    pub fn terminal_assets(&self) -> f64 {
        self.assets
            .iter()
            .rev()
            .copied()
            .find(|v| *v > 0.0)
            .unwrap_or(0.0)
    }

    /// Mean withdrawal over the periods in which this path was still drawing
    #[must_use]
    pub fn average_withdrawal(&self) -> Option<f64> {
        let n = self.years_survived();
        (n > 0).then(|| self.total_withdrawn / n as f64)
    }
}

/// A real path chosen to represent a percentile of the terminal distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentilePath {
    /// Requested percentile in [0, 1]
    pub percentile: f64,
    /// Interpolated terminal value at that percentile
    pub target_terminal: f64,
    /// Index of the selected path within the batch
    pub path_index: usize,
    /// Terminal value of the selected path
    pub terminal_assets: f64,
    pub assets: Vec<f64>,
    pub withdrawals: Vec<f64>,
}

/// Aggregate statistics over a decumulation batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeSummary {
    pub num_paths: usize,
    /// Fraction of paths that never ran out of money
    pub success_rate: f64,
    pub mean_terminal_assets: f64,
    pub median_terminal_assets: f64,
    pub min_terminal_assets: f64,
    pub max_terminal_assets: f64,
    /// Mean of the ruin period (or horizon for survivors)
    pub mean_years_survived: f64,
    /// Mean withdrawal per period, over the paths still drawing in that period.
    /// `None` once every path has been ruined.
    pub mean_withdrawal_by_period: Vec<Option<f64>>,
    /// Mean over paths of each path's average withdrawal
    pub overall_mean_withdrawal: f64,
    pub percentile_paths: Vec<PercentilePath>,
}

impl OutcomeSummary {
    /// Look up the representative path for a percentile
    #[must_use]
    pub fn percentile_path(&self, percentile: f64) -> Option<&PercentilePath> {
        self.percentile_paths
            .iter()
            .find(|p| (p.percentile - percentile).abs() < 1e-9)
    }
}

/// Result of an accumulation batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccumulationOutcome {
    pub num_paths: usize,
    pub successes: usize,
    /// Fraction of paths that reached the target before the time limit
    pub success_rate: f64,
    /// Mean years to reach the target over successful paths.
    /// `None` means no path reached the goal within the horizon.
    pub average_years_to_goal: Option<f64>,
    pub median_years_to_goal: Option<f64>,
}

impl AccumulationOutcome {
    #[must_use]
    pub fn goal_reached(&self) -> bool {
        self.average_years_to_goal.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ruined_path() -> DecumulationPath {
        DecumulationPath {
            assets: vec![100.0, 60.0, 20.0, 0.0, 0.0],
            withdrawals: vec![40.0, 40.0, 40.0, 0.0],
            ruin_period: Some(3),
            total_withdrawn: 120.0,
        }
    }

    #[test]
    fn test_terminal_assets_skips_zero_tail() {
        let path = ruined_path();
        assert_eq!(path.terminal_assets(), 20.0);
        assert!(!path.succeeded());
        assert_eq!(path.years_survived(), 3);
        assert_eq!(path.average_withdrawal(), Some(40.0));
    }

    #[test]
    fn test_terminal_assets_defaults_to_zero() {
        let path = DecumulationPath {
            assets: vec![0.0, 0.0],
            withdrawals: vec![0.0],
            ruin_period: Some(1),
            total_withdrawn: 10.0,
        };
        assert_eq!(path.terminal_assets(), 0.0);
    }
}
