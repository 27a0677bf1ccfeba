//! Summary Report
//!
//! Fixed-width console tables of unemployment and per-firm statistics at ten
//! evenly spaced rounds plus the final round.

use labor_events::{MarketDate, SimulationHistory};
use std::fmt;

const RULE_WIDTH: usize = 70;

/// Rounds sampled for a run of `steps` rounds: `i * steps / 10` for
/// `i in 0..10`, then the last round. Duplicates are dropped.
pub fn report_rounds(steps: usize) -> Vec<usize> {
    if steps == 0 {
        return Vec::new();
    }
    let mut rounds: Vec<usize> = (0..10).map(|i| i * steps / 10).collect();
    rounds.push(steps - 1);
    rounds.dedup();
    rounds
}

/// One firm's row in a round table
#[derive(Debug, Clone, PartialEq)]
pub struct FirmLine {
    pub firm_id: u32,
    pub headcount: usize,
    pub avg_salary: f64,
    pub profit: f64,
}

/// Statistics for one sampled round
#[derive(Debug, Clone, PartialEq)]
pub struct RoundReport {
    pub round: usize,
    pub unemployment: f64,
    pub firms: Vec<FirmLine>,
}

/// The console summary of a finished run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryReport {
    pub rounds: Vec<RoundReport>,
}

impl SummaryReport {
    pub fn from_history(history: &SimulationHistory) -> Self {
        let rounds = report_rounds(history.rounds())
            .into_iter()
            .map(|round| RoundReport {
                round,
                unemployment: history.unemployment[round],
                firms: history
                    .firm_stats
                    .get(round)
                    .map(|snapshot| {
                        snapshot
                            .iter()
                            .map(|(&firm_id, stats)| FirmLine {
                                firm_id,
                                headcount: stats.headcount,
                                avg_salary: stats.mean_salary,
                                profit: history.profit_at(firm_id, round).unwrap_or(0.0),
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
            })
            .collect();
        Self { rounds }
    }
}

fn write_round(out: &mut fmt::Formatter<'_>, report: &RoundReport) -> fmt::Result {
    let rule = "=".repeat(RULE_WIDTH);
    writeln!(out)?;
    writeln!(out, "{}", rule)?;
    writeln!(
        out,
        "After Round {} ({}):",
        report.round,
        MarketDate::from_round(report.round as u64)
    )?;
    writeln!(out, "{}", rule)?;
    writeln!(out, "Unemployment Rate: {:.2}%", report.unemployment)?;
    writeln!(out)?;
    writeln!(out, "FIRM STATISTICS:")?;
    writeln!(
        out,
        "{:<10} {:<10} {:<22} {:<18}",
        "Firm ID", "Workers", "Avg Salary (in 1000s)", "Profit (in 1000s)"
    )?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    for line in &report.firms {
        writeln!(
            out,
            "{:<10} {:<10} {:<22} {:<18}",
            line.firm_id,
            line.headcount,
            format!("${:.2}", line.avg_salary),
            format!("${:.2}", line.profit)
        )?;
    }
    Ok(())
}

impl fmt::Display for SummaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for report in &self.rounds {
            write_round(f, report)?;
        }
        Ok(())
    }
}
