//! Capital search
//!
//! Finds the smallest initial capital that sustains a fixed withdrawal with
//! a target probability, using the decumulation simulator as its oracle.
//!
//! # Example
//!
//! ```ignore
//! use retireplan_core::config::SimulationBuilder;
//! use retireplan_core::optimization::{CapitalSearch, SolverConfig, solve_initial_capital};
//!
//! let config = SimulationBuilder::new()
//!     .withdrawal_amount(40_000.0)
//!     .normal_returns(0.06, 0.12)
//!     .years(30)
//!     .paths(2_000)
//!     .seed(7)
//!     .build()?;
//!
//! let solver = SolverConfig::new(0.95, 0.0, 5_000_000.0);
//! match solve_initial_capital(&config, &solver, None, None)? {
//!     CapitalSearch::Found(solution) => println!("need {:.0}", solution.capital),
//!     CapitalSearch::NoFeasibleSolution(_) => println!("raise the upper bound"),
//! }
//! ```

mod binary_search;
mod config;
mod result;

pub use binary_search::{ProgressCallback, evaluation_seed, solve_initial_capital};
pub use config::SolverConfig;
pub use result::{
    CapitalEvaluation, CapitalSearch, CapitalSolution, ConvergenceHistory, TerminationReason,
};
