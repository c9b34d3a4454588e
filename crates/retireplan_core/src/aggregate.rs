//! Reduction of a decumulation batch into an [`OutcomeSummary`].
//!
//! The reduction is a pure function of the path slice: the same batch always
//! produces a bit-identical summary, whatever order the paths were computed in.

use crate::model::{DecumulationPath, OutcomeSummary, PercentilePath};

/// Percentile of an ascending slice with linear interpolation between order statistics
#[must_use]
pub fn percentile_of_sorted(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let weight = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * weight
}

/// Index of the value nearest to `target`; ties resolve to the lowest index
fn nearest_index(values: &[f64], target: f64) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (i, v) in values.iter().enumerate() {
        let distance = (v - target).abs();
        if distance < best_distance {
            best = i;
            best_distance = distance;
        }
    }
    best
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Reduce a batch of paths.
///
/// Each entry of `percentiles` selects the actual path whose terminal value is
/// nearest that percentile of the terminal distribution, so a reported asset
/// trajectory and its withdrawal trajectory always come from the same path.
#[must_use]
pub fn summarize(paths: &[DecumulationPath], percentiles: &[f64]) -> OutcomeSummary {
    let num_paths = paths.len();
    let horizon = paths.iter().map(|p| p.withdrawals.len()).max().unwrap_or(0);

    let terminals: Vec<f64> = paths.iter().map(DecumulationPath::terminal_assets).collect();
    let mut sorted = terminals.clone();
    sorted.sort_by(f64::total_cmp);

    let successes = paths.iter().filter(|p| p.succeeded()).count();
    let success_rate = if num_paths == 0 {
        0.0
    } else {
        successes as f64 / num_paths as f64
    };

    let mean_withdrawal_by_period = (0..horizon)
        .map(|t| {
            mean(
                paths
                    .iter()
                    .filter(|p| p.years_survived() > t)
                    .map(|p| p.withdrawals[t]),
            )
        })
        .collect();

    let percentile_paths = percentiles
        .iter()
        .filter(|_| num_paths > 0)
        .map(|&p| {
            let target_terminal = percentile_of_sorted(&sorted, p);
            let path_index = nearest_index(&terminals, target_terminal);
            let path = &paths[path_index];
            PercentilePath {
                percentile: p,
                target_terminal,
                path_index,
                terminal_assets: terminals[path_index],
                assets: path.assets.clone(),
                withdrawals: path.withdrawals.clone(),
            }
        })
        .collect();

    OutcomeSummary {
        num_paths,
        success_rate,
        mean_terminal_assets: mean(terminals.iter().copied()).unwrap_or(0.0),
        median_terminal_assets: percentile_of_sorted(&sorted, 0.5),
        min_terminal_assets: sorted.first().copied().unwrap_or(0.0),
        max_terminal_assets: sorted.last().copied().unwrap_or(0.0),
        mean_years_survived: mean(paths.iter().map(|p| p.years_survived() as f64))
            .unwrap_or(0.0),
        mean_withdrawal_by_period,
        overall_mean_withdrawal: mean(paths.iter().filter_map(DecumulationPath::average_withdrawal))
            .unwrap_or(0.0),
        percentile_paths,
    }
}
