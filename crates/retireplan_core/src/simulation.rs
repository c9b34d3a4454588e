//! Decumulation paths and the seeded batch runner shared by every Monte Carlo run

use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::config::SimulationConfig;
use crate::error::{Result, SimulationError};
use crate::model::{
    DecumulationPath, OutcomeSummary, ReturnSampler, WithdrawalState, real_return,
};
use crate::progress::SimulationProgress;

#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};

/// Paths per seeded batch. Fixed so results do not depend on thread count.
const MAX_BATCH_SIZE: usize = 100;

/// Resolve an optional seed, drawing a fresh one from the thread RNG if absent
#[must_use]
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| rand::rng().random())
}

fn batch_rng(base_seed: u64, batch: usize) -> SmallRng {
    SmallRng::seed_from_u64(base_seed ^ (batch as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Run `num_paths` independent paths in seeded batches.
///
/// Every path gets its own RNG seeded from its batch, and batches are
/// collected in index order, so the output is identical whether batches run
/// sequentially or on a rayon pool. Cancellation is checked between paths.
pub(crate) fn run_batches<T, F>(
    num_paths: usize,
    base_seed: u64,
    progress: Option<&SimulationProgress>,
    simulate_one: F,
) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(&mut SmallRng) -> T + Sync,
{
    let num_batches = num_paths.div_ceil(MAX_BATCH_SIZE);

    let run_batch = |i: usize| -> Result<Vec<T>> {
        let mut rng = batch_rng(base_seed, i);

        let batch_size = if i == num_batches - 1 {
            num_paths - i * MAX_BATCH_SIZE
        } else {
            MAX_BATCH_SIZE
        };

        let mut out = Vec::with_capacity(batch_size);
        for _ in 0..batch_size {
            if progress.is_some_and(SimulationProgress::is_cancelled) {
                return Err(SimulationError::Cancelled);
            }
            let mut path_rng = SmallRng::seed_from_u64(rng.next_u64());
            out.push(simulate_one(&mut path_rng));
        }
        if let Some(p) = progress {
            p.add(batch_size);
        }
        Ok(out)
    };

    #[cfg(feature = "parallel")]
    let batches: Vec<Vec<T>> = (0..num_batches)
        .into_par_iter()
        .map(run_batch)
        .collect::<Result<_>>()?;

    #[cfg(not(feature = "parallel"))]
    let batches: Vec<Vec<T>> = (0..num_batches).map(run_batch).collect::<Result<_>>()?;

    Ok(batches.into_iter().flatten().collect())
}

/// Simulate one decumulation path.
///
/// Each period draws a return, lets the policy decide the withdrawal on the
/// grown balance, then subtracts it. The path stops at the first period whose
/// balance is at or below zero; the remaining periods are recorded as zero.
pub fn simulate_path<R: Rng + ?Sized>(
    config: &SimulationConfig,
    sampler: &ReturnSampler,
    rng: &mut R,
) -> DecumulationPath {
    let years = config.years;
    let mut assets = Vec::with_capacity(years + 1);
    let mut withdrawals = Vec::with_capacity(years);
    let mut total_withdrawn = 0.0;
    let mut ruin_period = None;

    let mut balance = config.initial_capital;
    let mut state = WithdrawalState::new(config.initial_withdrawal(), balance);
    assets.push(balance);

    for period in 0..years {
        let nominal = sampler.sample(rng);
        let rate = if config.deflate_returns {
            real_return(nominal, config.inflation)
        } else {
            nominal
        };

        let grown = balance * (1.0 + rate);
        state = config.policy.step(state, grown, config.inflation);

        withdrawals.push(state.withdrawal);
        total_withdrawn += state.withdrawal;
        balance = grown - state.withdrawal;

        if balance <= 0.0 {
            assets.push(0.0);
            ruin_period = Some(period + 1);
            break;
        }
        assets.push(balance);
    }

    assets.resize(years + 1, 0.0);
    withdrawals.resize(years, 0.0);

    DecumulationPath {
        assets,
        withdrawals,
        ruin_period,
        total_withdrawn,
    }
}

/// A completed decumulation batch
#[derive(Debug, Clone)]
pub struct DecumulationRun {
    /// Seed the batch was generated from
    pub seed: u64,
    pub paths: Vec<DecumulationPath>,
}

impl DecumulationRun {
    /// Reduce the batch, reporting representative paths for `percentiles`
    #[must_use]
    pub fn summarize(&self, percentiles: &[f64]) -> OutcomeSummary {
        crate::aggregate::summarize(&self.paths, percentiles)
    }
}

pub fn run_decumulation(config: &SimulationConfig) -> Result<DecumulationRun> {
    run_decumulation_with_progress(config, None)
}

/// Validate `config` and simulate `config.num_paths` decumulation paths
pub fn run_decumulation_with_progress(
    config: &SimulationConfig,
    progress: Option<&SimulationProgress>,
) -> Result<DecumulationRun> {
    config.validate()?;
    let sampler = config.returns.sampler()?;
    let seed = resolve_seed(config.seed);

    tracing::debug!(
        num_paths = config.num_paths,
        years = config.years,
        policy = config.policy.name(),
        initial_capital = config.initial_capital,
        seed,
        "running decumulation batch"
    );

    let paths = run_batches(config.num_paths, seed, progress, |rng| {
        simulate_path(config, &sampler, rng)
    })?;

    Ok(DecumulationRun { seed, paths })
}

/// Run a decumulation batch and reduce it with the configured percentiles
pub fn run_and_summarize(
    config: &SimulationConfig,
    progress: Option<&SimulationProgress>,
) -> Result<(OutcomeSummary, DecumulationRun)> {
    let run = run_decumulation_with_progress(config, progress)?;
    let summary = run.summarize(&config.percentiles);

    tracing::debug!(
        success_rate = summary.success_rate,
        median_terminal = summary.median_terminal_assets,
        "decumulation batch summarized"
    );

    Ok((summary, run))
}
