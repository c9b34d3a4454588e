//! Serializable reports and their text rendering

use retireplan_core::model::{AccumulationOutcome, OutcomeSummary};
use retireplan_core::optimization::{ConvergenceHistory, TerminationReason};
use retireplan_core::projection::Projection;
use serde::Serialize;

use crate::util::format::{format_amount, format_percentage, format_years};

#[derive(Debug, Clone, Serialize)]
pub struct AccumulationReport {
    pub monthly_contribution: f64,
    pub initial_principal: f64,
    pub target: f64,
    pub max_years: u32,
    pub outcome: AccumulationOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct DecumulationReport {
    pub initial_capital: f64,
    pub initial_withdrawal: f64,
    pub policy: String,
    pub years: usize,
    /// Seed the batch was generated from
    pub seed: u64,
    pub summary: OutcomeSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct CapitalSearchReport {
    pub target_success_rate: f64,
    pub feasible: bool,
    pub capital: Option<f64>,
    pub termination_reason: Option<TerminationReason>,
    pub iterations: usize,
    pub history: ConvergenceHistory,
    /// Re-evaluated batch at the found capital
    pub result: Option<DecumulationReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    pub accumulation: AccumulationReport,
    pub retirement: DecumulationReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectionReport {
    pub annual_return: f64,
    pub monthly_contribution: f64,
    pub target: f64,
    pub projection: Projection,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Report {
    Accumulation(AccumulationReport),
    Decumulation(DecumulationReport),
    CapitalSearch(CapitalSearchReport),
    Plan(PlanReport),
    Projection(ProjectionReport),
}

impl Report {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Human-readable report
    #[must_use]
    pub fn render(&self) -> String {
        let mut lines = Vec::new();
        match self {
            Report::Accumulation(r) => render_accumulation(&mut lines, r),
            Report::Decumulation(r) => render_decumulation(&mut lines, r),
            Report::CapitalSearch(r) => render_capital_search(&mut lines, r),
            Report::Plan(r) => {
                render_accumulation(&mut lines, &r.accumulation);
                lines.push(String::new());
                render_decumulation(&mut lines, &r.retirement);
            }
            Report::Projection(r) => render_projection(&mut lines, r),
        }
        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

fn render_accumulation(lines: &mut Vec<String>, r: &AccumulationReport) {
    let o = &r.outcome;
    lines.push(format!("Accumulation ({} paths)", o.num_paths));
    lines.push(format!(
        "  principal {}, monthly contribution {}, target {}",
        format_amount(r.initial_principal),
        format_amount(r.monthly_contribution),
        format_amount(r.target)
    ));
    lines.push(format!(
        "  goal reached within {} years: {}",
        r.max_years,
        format_percentage(o.success_rate)
    ));
    lines.push(format!(
        "  average time to goal: {}",
        format_years(o.average_years_to_goal)
    ));
    lines.push(format!(
        "  median time to goal:  {}",
        format_years(o.median_years_to_goal)
    ));
}

fn render_decumulation(lines: &mut Vec<String>, r: &DecumulationReport) {
    let s = &r.summary;
    lines.push(format!(
        "Retirement ({} paths, {} years, {} policy, seed {})",
        s.num_paths, r.years, r.policy, r.seed
    ));
    lines.push(format!(
        "  capital {}, first withdrawal {}",
        format_amount(r.initial_capital),
        format_amount(r.initial_withdrawal)
    ));
    lines.push(format!(
        "  success rate:          {}",
        format_percentage(s.success_rate)
    ));
    lines.push(format!(
        "  mean years survived:   {:.1}",
        s.mean_years_survived
    ));
    lines.push(format!(
        "  terminal assets:       mean {}, median {}, min {}, max {}",
        format_amount(s.mean_terminal_assets),
        format_amount(s.median_terminal_assets),
        format_amount(s.min_terminal_assets),
        format_amount(s.max_terminal_assets)
    ));
    lines.push(format!(
        "  mean withdrawal:       {}",
        format_amount(s.overall_mean_withdrawal)
    ));

    for pp in &s.percentile_paths {
        lines.push(format!(
            "  P{:<3} path #{:<6} terminal {}",
            (pp.percentile * 100.0).round(),
            pp.path_index,
            format_amount(pp.terminal_assets)
        ));
    }

    if s.mean_withdrawal_by_period.is_empty() {
        return;
    }

    lines.push(String::new());
    let header: String = s
        .percentile_paths
        .iter()
        .map(|pp| format!("  {:>14}", format!("P{} assets", (pp.percentile * 100.0).round())))
        .collect();
    lines.push(format!("  {:>4}  {:>16}{header}", "year", "mean withdrawal"));

    for (t, mean) in s.mean_withdrawal_by_period.iter().enumerate() {
        let mean = mean.map_or_else(|| "-".to_string(), format_amount);
        let bands: String = s
            .percentile_paths
            .iter()
            .map(|pp| {
                let value = pp.assets.get(t + 1).copied().unwrap_or(0.0);
                format!("  {:>14}", format_amount(value))
            })
            .collect();
        lines.push(format!("  {:>4}  {:>16}{bands}", t + 1, mean));
    }
}

fn render_capital_search(lines: &mut Vec<String>, r: &CapitalSearchReport) {
    lines.push(format!(
        "Capital search for {} success ({} evaluations)",
        format_percentage(r.target_success_rate),
        r.history.num_evaluations()
    ));

    match (r.capital, &r.result) {
        (Some(capital), Some(result)) => {
            lines.push(format!("  required capital: {}", format_amount(capital)));
            if let Some(reason) = r.termination_reason {
                lines.push(format!(
                    "  stopped after {} iterations: {reason:?}",
                    r.iterations
                ));
            }
            lines.push(String::new());
            render_decumulation(lines, result);
        }
        _ => lines.push(
            "  no feasible capital: even the upper bound misses the target".to_string(),
        ),
    }
}

fn render_projection(lines: &mut Vec<String>, r: &ProjectionReport) {
    lines.push(format!(
        "Projection at a constant {} a year, contributing {} a month",
        format_percentage(r.annual_return),
        format_amount(r.monthly_contribution)
    ));
    lines.push(match r.projection.years_to_goal {
        Some(years) => format!(
            "  target {} reached in {years:.1} years",
            format_amount(r.target)
        ),
        None => format!(
            "  target {} not reached within 100 years",
            format_amount(r.target)
        ),
    });
    for (year, balance) in r.projection.yearly_balances.iter().enumerate() {
        lines.push(format!("  {year:>4}  {:>16}", format_amount(*balance)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use retireplan_core::model::PercentilePath;

    fn accumulation() -> AccumulationReport {
        AccumulationReport {
            monthly_contribution: 10_000.0,
            initial_principal: 0.0,
            target: 1_000_000.0,
            max_years: 50,
            outcome: AccumulationOutcome {
                num_paths: 100,
                successes: 0,
                success_rate: 0.0,
                average_years_to_goal: None,
                median_years_to_goal: None,
            },
        }
    }

    #[test]
    fn test_unreached_goal_rendered() {
        let text = Report::Accumulation(accumulation()).render();
        assert!(text.contains("0.00%"));
        assert!(text.contains("not reached"));
        assert!(text.contains("1,000,000"));
    }

    #[test]
    fn test_json_is_tagged() {
        let json = Report::Accumulation(accumulation()).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["kind"], "accumulation");
        assert_eq!(value["outcome"]["average_years_to_goal"], serde_json::Value::Null);
    }

    #[test]
    fn test_decumulation_table_rendered() {
        let report = Report::Decumulation(DecumulationReport {
            initial_capital: 100_000.0,
            initial_withdrawal: 5_000.0,
            policy: "fixed".to_string(),
            years: 2,
            seed: 7,
            summary: OutcomeSummary {
                num_paths: 1,
                success_rate: 1.0,
                mean_terminal_assets: 90_000.0,
                median_terminal_assets: 90_000.0,
                min_terminal_assets: 90_000.0,
                max_terminal_assets: 90_000.0,
                mean_years_survived: 2.0,
                mean_withdrawal_by_period: vec![Some(5_000.0), Some(5_000.0)],
                overall_mean_withdrawal: 5_000.0,
                percentile_paths: vec![PercentilePath {
                    percentile: 0.5,
                    target_terminal: 90_000.0,
                    path_index: 0,
                    terminal_assets: 90_000.0,
                    assets: vec![100_000.0, 95_000.0, 90_000.0],
                    withdrawals: vec![5_000.0, 5_000.0],
                }],
            },
        });
        let text = report.render();
        let lines: Vec<&str> = text.lines().collect();

        assert!(text.ends_with('\n'));
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[0], "Retirement (1 paths, 2 years, fixed policy, seed 7)");
        assert_eq!(lines[7], "");
        assert_eq!(lines[8], "  year   mean withdrawal      P50 assets");
        assert_eq!(lines[9], "     1             5,000          95,000");
        assert_eq!(lines[10], "     2             5,000          90,000");
    }

    #[test]
    fn test_plan_sections_separated() {
        let report = Report::Plan(PlanReport {
            accumulation: accumulation(),
            retirement: DecumulationReport {
                initial_capital: 0.0,
                initial_withdrawal: 0.0,
                policy: "fixed".to_string(),
                years: 1,
                seed: 0,
                summary: OutcomeSummary {
                    num_paths: 0,
                    success_rate: 0.0,
                    mean_terminal_assets: 0.0,
                    median_terminal_assets: 0.0,
                    min_terminal_assets: 0.0,
                    max_terminal_assets: 0.0,
                    mean_years_survived: 0.0,
                    mean_withdrawal_by_period: Vec::new(),
                    overall_mean_withdrawal: 0.0,
                    percentile_paths: Vec::new(),
                },
            },
        });
        let text = report.render();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[5], "");
        assert!(lines[6].starts_with("Retirement"));
    }

    #[test]
    fn test_infeasible_search_rendered() {
        let report = Report::CapitalSearch(CapitalSearchReport {
            target_success_rate: 0.95,
            feasible: false,
            capital: None,
            termination_reason: None,
            iterations: 0,
            history: ConvergenceHistory::new(),
            result: None,
        });
        assert!(report.render().contains("no feasible capital"));
    }
}
