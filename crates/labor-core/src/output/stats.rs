//! Statistics Output
//!
//! Accumulates market events over a run and summarizes them alongside the
//! unemployment history.

use labor_events::{MarketEvent, SimulationHistory};
use serde::Serialize;
use std::collections::BTreeMap;

/// Event count for a single round
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundTally {
    pub round: u64,
    pub event_count: usize,
}

/// Accumulates event counts while the simulation runs
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub rounds: u64,
    pub total_events: usize,
    pub events_by_type: BTreeMap<String, usize>,
    pub round_history: Vec<RoundTally>,
}

/// End-of-run statistics
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub rounds: u64,
    pub mean_unemployment: f64,
    pub min_unemployment: f64,
    pub max_unemployment: f64,
    pub final_unemployment: f64,
    pub hires: usize,
    pub offer_raises: usize,
    pub layoffs: usize,
    pub quits: usize,
    pub switches: usize,
    pub retirements: usize,
    pub entries: usize,
    /// Firm id -> wage offer at the end of the run
    pub final_wage_offers: BTreeMap<u32, f64>,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the events of one round
    pub fn record_round(&mut self, round: u64, events: &[MarketEvent]) {
        for event in events {
            *self
                .events_by_type
                .entry(event.kind.label().to_string())
                .or_insert(0) += 1;
        }
        self.total_events += events.len();
        self.rounds += 1;
        self.round_history.push(RoundTally {
            round,
            event_count: events.len(),
        });
    }

    /// Total events recorded with the given label
    pub fn count(&self, label: &str) -> usize {
        self.events_by_type.get(label).copied().unwrap_or(0)
    }

    pub fn summarize(
        &self,
        history: &SimulationHistory,
        final_wage_offers: BTreeMap<u32, f64>,
    ) -> RunSummary {
        let rates = &history.unemployment;
        let mean_unemployment = if rates.is_empty() {
            0.0
        } else {
            rates.iter().sum::<f64>() / rates.len() as f64
        };

        RunSummary {
            run_id: history.run_id.clone(),
            rounds: self.rounds,
            mean_unemployment,
            min_unemployment: rates.iter().copied().reduce(f64::min).unwrap_or(0.0),
            max_unemployment: rates.iter().copied().reduce(f64::max).unwrap_or(0.0),
            final_unemployment: history.latest_unemployment().unwrap_or(0.0),
            hires: self.count("hired"),
            offer_raises: self.count("offer_raised"),
            layoffs: self.count("laid_off"),
            quits: self.count("quit"),
            switches: self.count("switched"),
            retirements: self.count("retired"),
            entries: self.count("entered"),
            final_wage_offers,
        }
    }
}

impl RunSummary {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labor_events::{generate_event_id, EventKind, RoundStamp};

    fn event(seq: u64, kind: EventKind) -> MarketEvent {
        MarketEvent::new(generate_event_id(seq), RoundStamp::from_round(0), kind)
    }

    #[test]
    fn test_stats_new() {
        let stats = RunStats::new();
        assert_eq!(stats.total_events, 0);
        assert!(stats.events_by_type.is_empty());
    }

    #[test]
    fn test_record_and_summarize() {
        let mut stats = RunStats::new();
        stats.record_round(
            0,
            &[
                event(1, EventKind::Hired { firm_id: 0, worker_id: 1, wage_offer: 100.0 }),
                event(2, EventKind::Hired { firm_id: 0, worker_id: 2, wage_offer: 100.0 }),
                event(3, EventKind::Quit { firm_id: 0, worker_id: 1, reservation_wage: 101.0, wage_offer: 100.0 }),
            ],
        );
        stats.record_round(1, &[]);

        assert_eq!(stats.total_events, 3);
        assert_eq!(stats.count("hired"), 2);
        assert_eq!(stats.round_history[1], RoundTally { round: 1, event_count: 0 });

        let mut history = SimulationHistory::new([0]);
        history.record_unemployment(20.0);
        history.record_unemployment(10.0);

        let summary = stats.summarize(&history, BTreeMap::from([(0, 105.0)]));
        assert_eq!(summary.rounds, 2);
        assert_eq!(summary.hires, 2);
        assert_eq!(summary.quits, 1);
        assert_eq!(summary.layoffs, 0);
        assert_eq!(summary.mean_unemployment, 15.0);
        assert_eq!(summary.min_unemployment, 10.0);
        assert_eq!(summary.max_unemployment, 20.0);
        assert_eq!(summary.final_unemployment, 10.0);
        assert!(summary.to_json().unwrap().contains("\"final_wage_offers\""));
    }
}
