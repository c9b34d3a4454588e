//! Monte Carlo retirement planning library
//!
//! This crate simulates both sides of a retirement plan:
//! - Accumulation: periodic contributions until a wealth target is reached
//! - Decumulation: withdrawals from a portfolio over a fixed horizon
//! - Withdrawal policies (constant real withdrawal, Guyton-Klinger guardrails)
//! - Capital search for the smallest nest egg meeting a target success rate
//! - Deterministic savings projections at a constant return
//!
//! Runs are reproducible for a given seed regardless of thread count.
//!
//! # Builder DSL
//!
//! ```ignore
//! use retireplan_core::{SimulationBuilder, run_and_summarize};
//!
//! let config = SimulationBuilder::new()
//!     .initial_capital(1_000_000.0)
//!     .withdrawal_amount(40_000.0)
//!     .normal_returns(0.07, 0.15)
//!     .inflation(0.025)
//!     .guyton_klinger()
//!     .years(30)
//!     .seed(42)
//!     .build()?;
//!
//! let (summary, _run) = run_and_summarize(&config, None)?;
//! println!("success rate: {:.1}%", summary.success_rate * 100.0);
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod accumulation;
pub mod aggregate;
pub mod error;
pub mod optimization;
pub mod progress;
pub mod projection;
pub mod simulation;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use accumulation::{run_accumulation, run_accumulation_with_progress};
pub use aggregate::summarize;
pub use config::{AccumulationConfig, SimulationBuilder, SimulationConfig};
pub use error::{ConfigError, SimulationError};
pub use optimization::{CapitalSearch, SolverConfig, solve_initial_capital};
pub use progress::SimulationProgress;
pub use projection::{Projection, ProjectionConfig, project_accumulation};
pub use simulation::{
    DecumulationRun, run_and_summarize, run_decumulation, run_decumulation_with_progress,
};
