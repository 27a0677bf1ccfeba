//! History and Snapshot Types
//!
//! The engine's outputs: one unemployment rate per round, one profit per firm
//! per round, and a per-round snapshot of every firm's headcount and mean
//! salary. Reporting and plotting tools consume these.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Generates a fresh identifier for a simulation run.
pub fn generate_run_id() -> String {
    format!("run_{}", uuid::Uuid::new_v4().simple())
}

/// Headcount and mean salary of one firm at the end of a round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FirmRoundStats {
    pub headcount: usize,
    /// Mean reservation wage of current employees, 0.0 for an empty firm
    pub mean_salary: f64,
}

impl FirmRoundStats {
    pub fn new(headcount: usize, mean_salary: f64) -> Self {
        Self {
            headcount,
            mean_salary,
        }
    }

    /// Builds stats from the reservation wages of a firm's employees.
    pub fn from_salaries(salaries: &[f64]) -> Self {
        if salaries.is_empty() {
            return Self::default();
        }
        let total: f64 = salaries.iter().sum();
        Self {
            headcount: salaries.len(),
            mean_salary: total / salaries.len() as f64,
        }
    }
}

/// Firm id -> stats for a single round.
pub type FirmStatsSnapshot = BTreeMap<u32, FirmRoundStats>;

/// Firm id -> profit per round, in round order.
pub type ProfitHistory = BTreeMap<u32, Vec<f64>>;

/// Everything the driver records while the simulation runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationHistory {
    pub run_id: String,
    /// Unemployment rate in percent, one entry per completed round
    pub unemployment: Vec<f64>,
    pub profits: ProfitHistory,
    pub firm_stats: Vec<FirmStatsSnapshot>,
}

impl SimulationHistory {
    /// Creates an empty history with a profit series for every firm.
    pub fn new(firm_ids: impl IntoIterator<Item = u32>) -> Self {
        Self {
            run_id: generate_run_id(),
            unemployment: Vec::new(),
            profits: firm_ids.into_iter().map(|id| (id, Vec::new())).collect(),
            firm_stats: Vec::new(),
        }
    }

    /// Number of completed rounds.
    pub fn rounds(&self) -> usize {
        self.unemployment.len()
    }

    pub fn record_unemployment(&mut self, rate: f64) {
        self.unemployment.push(rate);
    }

    pub fn record_profit(&mut self, firm_id: u32, profit: f64) {
        self.profits.entry(firm_id).or_default().push(profit);
    }

    pub fn record_firm_stats(&mut self, snapshot: FirmStatsSnapshot) {
        self.firm_stats.push(snapshot);
    }

    /// Highest profit a firm has ever recorded.
    pub fn peak_profit(&self, firm_id: u32) -> Option<f64> {
        self.profits
            .get(&firm_id)?
            .iter()
            .copied()
            .reduce(f64::max)
    }

    /// Profit a firm recorded in the given round.
    pub fn profit_at(&self, firm_id: u32, round: usize) -> Option<f64> {
        self.profits.get(&firm_id)?.get(round).copied()
    }

    pub fn latest_unemployment(&self) -> Option<f64> {
        self.unemployment.last().copied()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }
}
