//! Bisection over initial capital
//!
//! Success rate is, in expectation, non-decreasing in initial capital for a
//! fixed withdrawal amount, so bisection finds the smallest capital that
//! meets a target. Each evaluation is a separate finite batch with its own
//! seed; sampling noise can make one realization of the search non-monotone,
//! so the answer is only accurate up to that noise. Larger path counts shrink
//! it.

use crate::config::SimulationConfig;
use crate::error::{ConfigError, Result, SimulationError};
use crate::model::{OutcomeSummary, WithdrawalSpec};
use crate::progress::SimulationProgress;
use crate::simulation::{DecumulationRun, resolve_seed, run_and_summarize};

use super::config::SolverConfig;
use super::result::{
    CapitalEvaluation, CapitalSearch, CapitalSolution, ConvergenceHistory, TerminationReason,
};

/// Progress callback for the capital search
///
/// Arguments: (iteration, `capital`, `success_rate`)
pub type ProgressCallback = Box<dyn Fn(usize, f64, f64) + Send + Sync>;

/// Seed for the `index`-th evaluation of a search started from `base_seed`
#[must_use]
pub fn evaluation_seed(base_seed: u64, index: usize) -> u64 {
    base_seed.wrapping_add((index as u64 + 1).wrapping_mul(0xD1B5_4A32_D192_ED03))
}

struct Evaluator<'a> {
    config: &'a SimulationConfig,
    target_success_rate: f64,
    base_seed: u64,
    progress: Option<&'a SimulationProgress>,
    history: ConvergenceHistory,
}

impl Evaluator<'_> {
    fn next_seed(&self) -> u64 {
        evaluation_seed(self.base_seed, self.history.num_evaluations())
    }

    fn run(&self, capital: f64, seed: u64) -> Result<(OutcomeSummary, DecumulationRun)> {
        if self.progress.is_some_and(SimulationProgress::is_cancelled) {
            return Err(SimulationError::Cancelled);
        }
        let config = self
            .config
            .with_initial_capital(capital)
            .with_seed(Some(seed));
        let result = run_and_summarize(&config, None)?;
        if let Some(p) = self.progress {
            p.add(1);
        }
        Ok(result)
    }

    /// Evaluate `capital`, record it, and report whether it met the target
    fn feasible(&mut self, capital: f64) -> Result<(bool, f64)> {
        let seed = self.next_seed();
        let (summary, _) = self.run(capital, seed)?;
        let feasible = summary.success_rate >= self.target_success_rate;

        tracing::debug!(
            capital,
            success_rate = summary.success_rate,
            feasible,
            "capital evaluated"
        );

        self.history.record(CapitalEvaluation {
            capital,
            seed,
            success_rate: summary.success_rate,
            feasible,
        });
        Ok((feasible, summary.success_rate))
    }
}

/// Find the smallest initial capital whose success rate meets the target.
///
/// The upper bound is evaluated first; if it misses the target the search
/// ends with [`CapitalSearch::NoFeasibleSolution`]. If the lower bound already
/// meets it, the lower bound is the answer. Otherwise the bracket is halved
/// until it is no wider than `solver.tolerance` or `solver.max_iterations`
/// steps have run, and the upper end of the bracket is returned together
/// with a fresh batch simulated at that capital.
///
/// `progress` counts evaluations and is checked for cancellation before each
/// one. The withdrawal must be a fixed amount.
pub fn solve_initial_capital(
    config: &SimulationConfig,
    solver: &SolverConfig,
    progress: Option<&SimulationProgress>,
    progress_callback: Option<ProgressCallback>,
) -> Result<CapitalSearch> {
    solver.validate()?;
    if matches!(config.withdrawal, WithdrawalSpec::Rate(_)) {
        return Err(ConfigError::RateWithdrawalInSolver.into());
    }
    config.with_initial_capital(solver.high).validate()?;

    let mut evaluator = Evaluator {
        config,
        target_success_rate: solver.target_success_rate,
        base_seed: resolve_seed(config.seed),
        progress,
        history: ConvergenceHistory::new(),
    };

    tracing::debug!(
        target = solver.target_success_rate,
        low = solver.low,
        high = solver.high,
        tolerance = solver.tolerance,
        "starting capital search"
    );

    let (high_ok, _) = evaluator.feasible(solver.high)?;
    if !high_ok {
        tracing::info!(
            high = solver.high,
            "upper bound misses the target success rate"
        );
        return Ok(CapitalSearch::NoFeasibleSolution(evaluator.history));
    }

    let mut low = solver.low;
    let mut high = solver.high;
    let mut iteration = 0;

    let (low_ok, _) = evaluator.feasible(low)?;
    let termination_reason = if low_ok {
        high = low;
        TerminationReason::LowerBoundFeasible
    } else {
        while iteration < solver.max_iterations && high - low > solver.tolerance {
            iteration += 1;
            let mid = f64::midpoint(low, high);
            let (ok, success_rate) = evaluator.feasible(mid)?;

            if let Some(ref callback) = progress_callback {
                callback(iteration, mid, success_rate);
            }

            if ok {
                high = mid;
            } else {
                low = mid;
            }
        }

        if high - low > solver.tolerance {
            TerminationReason::MaxIterationsReached
        } else {
            TerminationReason::Converged
        }
    };

    let (summary, run) = evaluator.run(high, evaluator.next_seed())?;

    tracing::info!(
        capital = high,
        success_rate = summary.success_rate,
        evaluations = evaluator.history.num_evaluations() + 1,
        ?termination_reason,
        "capital search finished"
    );

    Ok(CapitalSearch::Found(Box::new(CapitalSolution {
        capital: high,
        summary,
        run,
        termination_reason,
        iterations: iteration,
        history: evaluator.history,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationBuilder;

    fn flat_config() -> SimulationConfig {
        SimulationBuilder::new()
            .withdrawal_amount(40_000.0)
            .fixed_return(0.0)
            .inflation(0.0)
            .fixed_policy()
            .years(25)
            .paths(20)
            .seed(9)
            .build()
            .unwrap()
    }

    #[test]
    fn test_rate_withdrawal_rejected() {
        let config = SimulationConfig::default();
        let result = solve_initial_capital(&config, &SolverConfig::default(), None, None);
        assert_eq!(
            result.err(),
            Some(SimulationError::Config(ConfigError::RateWithdrawalInSolver))
        );
    }

    #[test]
    fn test_infeasible_upper_bound() {
        let solver = SolverConfig::new(0.9, 0.0, 500_000.0);
        let search = solve_initial_capital(&flat_config(), &solver, None, None).unwrap();

        match search {
            CapitalSearch::NoFeasibleSolution(history) => {
                assert_eq!(history.num_evaluations(), 1);
                assert_eq!(history.evaluations[0].capital, 500_000.0);
            }
            CapitalSearch::Found(_) => panic!("upper bound cannot sustain 25 years"),
        }
    }

    #[test]
    fn test_feasible_lower_bound_returned() {
        let solver = SolverConfig::new(0.9, 2_000_000.0, 3_000_000.0);
        let search = solve_initial_capital(&flat_config(), &solver, None, None).unwrap();
        let solution = search.solution().unwrap();

        assert_eq!(solution.capital, 2_000_000.0);
        assert_eq!(
            solution.termination_reason,
            TerminationReason::LowerBoundFeasible
        );
        assert_eq!(solution.iterations, 0);
    }

    #[test]
    fn test_callback_sees_every_iteration() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let callback: ProgressCallback = Box::new(move |_, _, _| {
            counter.fetch_add(1, Ordering::Relaxed);
        });

        let solver = SolverConfig::new(0.9, 0.0, 2_000_000.0).with_tolerance(1_000.0);
        let search = solve_initial_capital(&flat_config(), &solver, None, Some(callback)).unwrap();
        let solution = search.solution().unwrap();

        assert_eq!(calls.load(Ordering::Relaxed), solution.iterations);
        assert_eq!(solution.history.num_evaluations(), solution.iterations + 2);
    }

    #[test]
    fn test_iteration_cap() {
        let solver = SolverConfig::new(0.9, 0.0, 2_000_000.0).with_max_iterations(3);
        let search = solve_initial_capital(&flat_config(), &solver, None, None).unwrap();
        let solution = search.solution().unwrap();

        assert_eq!(solution.iterations, 3);
        assert_eq!(
            solution.termination_reason,
            TerminationReason::MaxIterationsReached
        );
        assert!(!solution.converged());
    }

    #[test]
    fn test_cancelled_search() {
        let progress = SimulationProgress::new();
        progress.cancel();
        let solver = SolverConfig::new(0.9, 0.0, 2_000_000.0);
        let result = solve_initial_capital(&flat_config(), &solver, Some(&progress), None);
        assert_eq!(result.err(), Some(SimulationError::Cancelled));
    }

    #[test]
    fn test_evaluation_seeds_differ() {
        let a = evaluation_seed(42, 0);
        let b = evaluation_seed(42, 1);
        assert_ne!(a, b);
        assert_eq!(a, evaluation_seed(42, 0));
    }
}
