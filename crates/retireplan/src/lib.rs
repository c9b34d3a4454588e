//! Command-line front end for retireplan_core
//!
//! Reads a YAML scenario (rates in percent), runs one of the planning
//! commands and prints a text or JSON report:
//! - `accumulate` - Monte Carlo saving toward a target
//! - `decumulate` - Monte Carlo retirement withdrawals
//! - `solve` - smallest capital for a target success rate
//! - `plan` - accumulate to the target, then retire on it
//! - `project` - constant-return savings projection

pub mod cli;
pub mod commands;
pub mod data;
pub mod logging;
pub mod report;
pub mod util;

#[cfg(test)]
mod tests;

pub use cli::{Args, Command};
pub use commands::run;
pub use logging::init_logging;
