//! Subcommand execution

use retireplan_core::{
    accumulation::run_accumulation,
    config::SimulationConfig,
    model::OutcomeSummary,
    optimization::{CapitalSearch, ProgressCallback, solve_initial_capital},
    projection::project_accumulation,
    simulation::{DecumulationRun, run_and_summarize},
};

use crate::cli::{Args, Command};
use crate::data::{ScenarioData, convert};
use crate::report::{
    AccumulationReport, CapitalSearchReport, DecumulationReport, PlanReport, ProjectionReport,
    Report,
};

/// Run the selected subcommand and render its report
pub fn run(args: &Args) -> color_eyre::Result<String> {
    let scenario = args.load_scenario()?;
    let report = execute(&args.command, &scenario)?;
    if args.json {
        Ok(report.to_json()?)
    } else {
        Ok(report.render())
    }
}

pub fn execute(command: &Command, scenario: &ScenarioData) -> color_eyre::Result<Report> {
    tracing::info!(?command, paths = scenario.simulation.paths, "running");

    let report = match command {
        Command::Accumulate => Report::Accumulation(accumulate(scenario)?),
        Command::Decumulate { .. } => {
            Report::Decumulation(decumulate(scenario, scenario.retirement_capital())?)
        }
        Command::Solve { .. } => Report::CapitalSearch(solve(scenario)?),
        Command::Plan => Report::Plan(PlanReport {
            accumulation: accumulate(scenario)?,
            retirement: decumulate(scenario, scenario.accumulation.target)?,
        }),
        Command::Project => Report::Projection(project(scenario)?),
    };
    Ok(report)
}

fn accumulate(scenario: &ScenarioData) -> color_eyre::Result<AccumulationReport> {
    let config = convert::to_accumulation_config(scenario)?;
    let outcome = run_accumulation(&config)?;

    tracing::info!(
        success_rate = outcome.success_rate,
        average_years = ?outcome.average_years_to_goal,
        "accumulation finished"
    );

    Ok(AccumulationReport {
        monthly_contribution: config.contribution,
        initial_principal: config.initial_principal,
        target: config.target,
        max_years: config.max_years,
        outcome,
    })
}

fn decumulation_report(
    config: &SimulationConfig,
    summary: OutcomeSummary,
    run: &DecumulationRun,
) -> DecumulationReport {
    DecumulationReport {
        initial_capital: config.initial_capital,
        initial_withdrawal: config.initial_withdrawal(),
        policy: config.policy.name().to_string(),
        years: config.years,
        seed: run.seed,
        summary,
    }
}

fn decumulate(scenario: &ScenarioData, capital: f64) -> color_eyre::Result<DecumulationReport> {
    let config = convert::to_simulation_config(scenario, capital)?;
    let (summary, run) = run_and_summarize(&config, None)?;

    tracing::info!(
        success_rate = summary.success_rate,
        median_terminal = summary.median_terminal_assets,
        "decumulation finished"
    );

    Ok(decumulation_report(&config, summary, &run))
}

fn solve(scenario: &ScenarioData) -> color_eyre::Result<CapitalSearchReport> {
    let solver = convert::to_solver_config(scenario)?;
    let config = convert::to_simulation_config(scenario, solver.high)?;

    let callback: ProgressCallback = Box::new(|iteration, capital, success_rate| {
        tracing::debug!(iteration, capital, success_rate, "bisection step");
    });

    let report = match solve_initial_capital(&config, &solver, None, Some(callback))? {
        CapitalSearch::Found(solution) => {
            let solved = config.with_initial_capital(solution.capital);
            CapitalSearchReport {
                target_success_rate: solver.target_success_rate,
                feasible: true,
                capital: Some(solution.capital),
                termination_reason: Some(solution.termination_reason),
                iterations: solution.iterations,
                result: Some(decumulation_report(
                    &solved,
                    solution.summary.clone(),
                    &solution.run,
                )),
                history: solution.history,
            }
        }
        CapitalSearch::NoFeasibleSolution(history) => {
            tracing::warn!(high = solver.high, "no feasible capital within bounds");
            CapitalSearchReport {
                target_success_rate: solver.target_success_rate,
                feasible: false,
                capital: None,
                termination_reason: None,
                iterations: 0,
                history,
                result: None,
            }
        }
    };
    Ok(report)
}

fn project(scenario: &ScenarioData) -> color_eyre::Result<ProjectionReport> {
    let config = convert::to_projection_config(scenario)?;
    let projection = project_accumulation(&config)?;
    Ok(ProjectionReport {
        annual_return: config.annual_return,
        monthly_contribution: config.monthly_contribution,
        target: config.target,
        projection,
    })
}
