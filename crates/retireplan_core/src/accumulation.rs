//! Contribution-phase simulation
//!
//! Each path adds a contribution at the start of every period, grows the
//! balance by a sampled period return, and stops as soon as the target is
//! reached or the period limit runs out.

use rand::Rng;

use crate::aggregate::percentile_of_sorted;
use crate::config::AccumulationConfig;
use crate::error::Result;
use crate::model::{AccumulationOutcome, ReturnSampler};
use crate::progress::SimulationProgress;
use crate::simulation::{resolve_seed, run_batches};

/// Periods needed to reach the target on one path, or `None` if the limit ran out.
///
/// A principal already at or above the target reaches it in zero periods.
pub fn simulate_accumulation_path<R: Rng + ?Sized>(
    config: &AccumulationConfig,
    period_sampler: &ReturnSampler,
    rng: &mut R,
) -> Option<usize> {
    let mut assets = config.initial_principal;
    if assets >= config.target {
        return Some(0);
    }

    for period in 1..=config.max_periods() {
        assets += config.contribution;
        assets *= 1.0 + period_sampler.sample(rng);
        if assets >= config.target {
            return Some(period);
        }
    }
    None
}

pub fn run_accumulation(config: &AccumulationConfig) -> Result<AccumulationOutcome> {
    run_accumulation_with_progress(config, None)
}

/// Validate `config` and run `config.num_paths` accumulation paths
pub fn run_accumulation_with_progress(
    config: &AccumulationConfig,
    progress: Option<&SimulationProgress>,
) -> Result<AccumulationOutcome> {
    config.validate()?;
    let sampler = config.returns.per_period(config.periods_per_year).sampler()?;
    let seed = resolve_seed(config.seed);

    tracing::debug!(
        num_paths = config.num_paths,
        max_years = config.max_years,
        target = config.target,
        seed,
        "running accumulation batch"
    );

    let periods = run_batches(config.num_paths, seed, progress, |rng| {
        simulate_accumulation_path(config, &sampler, rng)
    })?;

    let ppy = f64::from(config.periods_per_year);
    let mut years: Vec<f64> = periods.iter().flatten().map(|&p| p as f64 / ppy).collect();
    let successes = years.len();

    let (average_years_to_goal, median_years_to_goal) = if successes == 0 {
        (None, None)
    } else {
        let average = years.iter().sum::<f64>() / successes as f64;
        years.sort_by(f64::total_cmp);
        (Some(average), Some(percentile_of_sorted(&years, 0.5)))
    };

    let outcome = AccumulationOutcome {
        num_paths: config.num_paths,
        successes,
        success_rate: successes as f64 / config.num_paths as f64,
        average_years_to_goal,
        median_years_to_goal,
    };

    tracing::debug!(
        success_rate = outcome.success_rate,
        average_years = ?outcome.average_years_to_goal,
        "accumulation batch finished"
    );

    Ok(outcome)
}
