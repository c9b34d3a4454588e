use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::data::ScenarioData;

#[derive(Parser, Debug)]
#[command(name = "retireplan")]
#[command(about = "Monte Carlo retirement planner: saving, spending and capital search")]
pub struct Args {
    /// YAML scenario file (rates in percent); built-in defaults when omitted
    #[arg(short, long, global = true)]
    pub scenario: Option<PathBuf>,

    /// Fixed seed for reproducible runs
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Number of simulated paths
    #[arg(short, long, global = true)]
    pub paths: Option<usize>,

    /// Print the report as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Simulate monthly saving toward the target
    Accumulate,

    /// Simulate retirement withdrawals
    Decumulate {
        /// Starting capital (defaults to the scenario's capital or target)
        #[arg(long)]
        capital: Option<f64>,
    },

    /// Find the smallest capital that meets a success rate
    Solve {
        /// Required success rate in percent
        #[arg(long)]
        target: Option<f64>,

        /// First-year withdrawal amount, replacing the scenario's withdrawal
        #[arg(long)]
        withdrawal: Option<f64>,
    },

    /// Save toward the target, then retire on it
    Plan,

    /// Constant-return projection of the saving phase
    Project,
}

impl Args {
    /// Scenario from `--scenario` (or defaults) with command-line overrides applied
    pub fn load_scenario(&self) -> color_eyre::Result<ScenarioData> {
        let mut scenario = match &self.scenario {
            Some(path) => ScenarioData::load(path)?,
            None => ScenarioData::default(),
        };

        if let Some(seed) = self.seed {
            scenario.simulation.seed = Some(seed);
        }
        if let Some(paths) = self.paths {
            scenario.simulation.paths = paths;
        }

        match self.command {
            Command::Decumulate {
                capital: Some(capital),
            } => scenario.retirement.capital = Some(capital),
            Command::Solve { target, withdrawal } => {
                if let Some(target) = target {
                    scenario.solver.target_success_rate = target;
                }
                if let Some(amount) = withdrawal {
                    scenario.retirement.withdrawal_amount = Some(amount);
                    scenario.retirement.withdrawal_rate = None;
                }
            }
            _ => {}
        }

        Ok(scenario)
    }
}
