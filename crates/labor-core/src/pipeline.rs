//! Round Pipeline
//!
//! A round is an explicit, ordered list of phases. Each phase owns its own
//! schedule on a single-threaded executor and runs to completion, deferred
//! commands included, before the next phase starts.

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::ExecutorKind;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::systems::{
    hiring_phase, job_switching_phase, open_round, profit_phase, record_firm_stats,
    record_unemployment, retirement_phase, wage_update_phase,
};

/// One step of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Hiring,
    ProfitAndLayoffs,
    WageAndLoyalty,
    JobSwitching,
    RetirementAndReplacement,
    Unemployment,
    FirmStats,
}

/// The order phases run in every round
pub const PHASE_ORDER: [Phase; 7] = [
    Phase::Hiring,
    Phase::ProfitAndLayoffs,
    Phase::WageAndLoyalty,
    Phase::JobSwitching,
    Phase::RetirementAndReplacement,
    Phase::Unemployment,
    Phase::FirmStats,
];

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Hiring => "hiring",
            Phase::ProfitAndLayoffs => "profit_and_layoffs",
            Phase::WageAndLoyalty => "wage_and_loyalty",
            Phase::JobSwitching => "job_switching",
            Phase::RetirementAndReplacement => "retirement_and_replacement",
            Phase::Unemployment => "unemployment",
            Phase::FirmStats => "firm_stats",
        }
    }

    /// Whether the phase changes agents rather than only measuring them
    pub fn mutates_population(self) -> bool {
        !matches!(self, Phase::Unemployment | Phase::FirmStats)
    }

    fn schedule(self) -> Schedule {
        let mut schedule = Schedule::default();
        schedule.set_executor_kind(ExecutorKind::SingleThreaded);
        match self {
            Phase::Hiring => schedule.add_systems((open_round, hiring_phase).chain()),
            Phase::ProfitAndLayoffs => schedule.add_systems(profit_phase),
            Phase::WageAndLoyalty => schedule.add_systems(wage_update_phase),
            Phase::JobSwitching => schedule.add_systems(job_switching_phase),
            Phase::RetirementAndReplacement => schedule.add_systems(retirement_phase),
            Phase::Unemployment => schedule.add_systems(record_unemployment),
            Phase::FirmStats => schedule.add_systems(record_firm_stats),
        };
        schedule
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Runs the phases of a round in a fixed order
pub struct RoundPipeline {
    stages: Vec<(Phase, Schedule)>,
}

impl Default for RoundPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl RoundPipeline {
    /// The standard round
    pub fn new() -> Self {
        Self::with_phases(PHASE_ORDER)
    }

    /// A pipeline running only the given phases, in the given order
    pub fn with_phases(phases: impl IntoIterator<Item = Phase>) -> Self {
        Self {
            stages: phases
                .into_iter()
                .map(|phase| (phase, phase.schedule()))
                .collect(),
        }
    }

    pub fn phases(&self) -> Vec<Phase> {
        self.stages.iter().map(|(phase, _)| *phase).collect()
    }

    /// Run every phase once, in order
    pub fn run_round(&mut self, world: &mut World) {
        for (phase, schedule) in &mut self.stages {
            tracing::trace!("Running phase {}", phase);
            schedule.run(world);
        }
    }

    /// Run a single phase. Returns false if the pipeline does not contain it.
    pub fn run_phase(&mut self, phase: Phase, world: &mut World) -> bool {
        match self.stages.iter_mut().find(|(p, _)| *p == phase) {
            Some((_, schedule)) => {
                schedule.run(world);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::firm::Firm;
    use crate::components::worker::Worker;
    use crate::output::MarketHistory;
    use crate::rng::ScriptedSource;
    use crate::systems::test_support::*;

    #[test]
    fn test_default_order() {
        let pipeline = RoundPipeline::new();
        assert_eq!(pipeline.phases(), PHASE_ORDER.to_vec());
        assert_eq!(PHASE_ORDER[0], Phase::Hiring);
        assert_eq!(PHASE_ORDER[4], Phase::RetirementAndReplacement);
        assert!(!Phase::FirmStats.mutates_population());
    }

    #[test]
    fn test_run_missing_phase() {
        let mut world = world_with(ScriptedSource::constant(0.0));
        let mut pipeline = RoundPipeline::with_phases([Phase::Unemployment]);
        assert!(!pipeline.run_phase(Phase::Hiring, &mut world));
        assert!(pipeline.run_phase(Phase::Unemployment, &mut world));
    }

    #[test]
    fn test_later_phases_see_earlier_mutations() {
        // hire in phase 1, then profit in phase 2 counts the new employee
        let mut world = world_with(ScriptedSource::new([0.0, 0.0]).with_fallback(0.99));
        let firm = spawn_firm(&mut world, 0, 100.0);
        let w = world.spawn(worker(1, 90.0, 1.2)).id();

        let mut pipeline = RoundPipeline::with_phases([Phase::Hiring, Phase::ProfitAndLayoffs]);
        pipeline.run_round(&mut world);

        assert_eq!(world.get::<Worker>(w).unwrap().employer, Some(firm));
        let profit = world.get::<Firm>(firm).unwrap().profit;
        assert!((profit - (1.2 * 100.0 - 90.0)).abs() < 1e-9);
        assert_eq!(world.resource::<MarketHistory>().profits[&0].len(), 1);
    }

    #[test]
    fn test_phase_labels_serialize() {
        assert_eq!(Phase::JobSwitching.to_string(), "job_switching");
        let json = serde_json::to_string(&Phase::ProfitAndLayoffs).unwrap();
        assert_eq!(json, "\"profit_and_layoffs\"");
    }
}
