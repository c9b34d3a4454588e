//! Capital search result types
//!
//! Contains types for tracking search progress and the final answer.

use serde::{Deserialize, Serialize};

use crate::model::OutcomeSummary;
use crate::simulation::DecumulationRun;

/// A single evaluation during the search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapitalEvaluation {
    /// Initial capital that was simulated
    pub capital: f64,

    /// Seed of the independent batch behind this evaluation
    pub seed: u64,

    pub success_rate: f64,

    /// Whether the success rate met the target
    pub feasible: bool,
}

/// History of evaluations during the search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceHistory {
    /// All evaluations, in the order they ran
    pub evaluations: Vec<CapitalEvaluation>,

    /// Smallest feasible capital seen after each evaluation
    pub best_capital: Vec<Option<f64>>,
}

impl ConvergenceHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new evaluation
    pub fn record(&mut self, evaluation: CapitalEvaluation) {
        let current = self.best_capital.last().copied().flatten();
        let best = match (current, evaluation.feasible) {
            (Some(best), true) => Some(best.min(evaluation.capital)),
            (None, true) => Some(evaluation.capital),
            (best, false) => best,
        };
        self.best_capital.push(best);
        self.evaluations.push(evaluation);
    }

    #[must_use]
    pub fn num_evaluations(&self) -> usize {
        self.evaluations.len()
    }

    /// Smallest feasible capital evaluated so far
    #[must_use]
    pub fn best(&self) -> Option<f64> {
        self.best_capital.last().copied().flatten()
    }
}

/// Reason why the search terminated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationReason {
    /// The bracket narrowed to the tolerance
    Converged,

    /// Maximum iterations reached before the bracket narrowed
    MaxIterationsReached,

    /// The lower bound already met the target
    LowerBoundFeasible,
}

/// Capital found by the search, with the re-evaluated batch at that capital
#[derive(Debug, Clone)]
pub struct CapitalSolution {
    /// Smallest capital whose evaluation met the target
    pub capital: f64,

    /// Summary of a fresh batch at `capital`
    pub summary: OutcomeSummary,

    /// Paths behind `summary`
    pub run: DecumulationRun,

    pub termination_reason: TerminationReason,

    /// Bisection steps performed
    pub iterations: usize,

    /// Full evaluation history, excluding the final re-evaluation
    pub history: ConvergenceHistory,
}

impl CapitalSolution {
    #[must_use]
    pub fn converged(&self) -> bool {
        self.termination_reason != TerminationReason::MaxIterationsReached
    }
}

/// Outcome of a capital search
#[derive(Debug, Clone)]
pub enum CapitalSearch {
    Found(Box<CapitalSolution>),

    /// Even the upper bound missed the target; carries the evaluations made
    NoFeasibleSolution(ConvergenceHistory),
}

impl CapitalSearch {
    #[must_use]
    pub fn solution(&self) -> Option<&CapitalSolution> {
        match self {
            CapitalSearch::Found(solution) => Some(solution.as_ref()),
            CapitalSearch::NoFeasibleSolution(_) => None,
        }
    }

    #[must_use]
    pub fn history(&self) -> &ConvergenceHistory {
        match self {
            CapitalSearch::Found(solution) => &solution.history,
            CapitalSearch::NoFeasibleSolution(history) => history,
        }
    }
}
