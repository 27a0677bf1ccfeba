//! Labor Market Driver
//!
//! Owns the ECS world and the round pipeline. Builds the initial environment,
//! runs rounds, drains each round's events to the log and run statistics, and
//! exposes the recorded histories.

use bevy_ecs::prelude::*;
use labor_events::{MarketEvent, SimulationHistory};
use std::collections::BTreeMap;

use crate::components::firm::{Firm, FirmId};
use crate::components::worker::Worker;
use crate::config::MarketRules;
use crate::events::{EventLogger, RoundEvents};
use crate::invariants::{check_population, InvariantViolation};
use crate::output::{MarketHistory, RunStats, RunSummary};
use crate::pipeline::{Phase, RoundPipeline};
use crate::rng::SimRng;
use crate::setup::{
    create_environment, EnvironmentParams, ReplacementProfile, WorkerIdAllocator,
};
use crate::systems::{unemployment_rate, RoundClock};

/// A running labor market simulation
pub struct LaborMarket {
    world: World,
    pipeline: RoundPipeline,
    logger: Option<EventLogger>,
    stats: RunStats,
    next_round: u64,
    report_interval: u64,
}

impl LaborMarket {
    /// An empty market with the given rules and random source
    pub fn new(rules: MarketRules, rng: SimRng) -> Self {
        let mut world = World::new();
        world.insert_resource(rules);
        world.insert_resource(rng);
        world.insert_resource(RoundClock::default());
        world.insert_resource(RoundEvents::new());
        world.insert_resource(MarketHistory(SimulationHistory::default()));
        world.insert_resource(WorkerIdAllocator::default());
        world.insert_resource(ReplacementProfile::default());

        Self {
            world,
            pipeline: RoundPipeline::new(),
            logger: None,
            stats: RunStats::new(),
            next_round: 0,
            report_interval: 0,
        }
    }

    /// A market populated with freshly sampled firms and unemployed workers
    pub fn create_environment(params: &EnvironmentParams, rules: MarketRules, rng: SimRng) -> Self {
        let mut market = Self::new(rules, rng);
        create_environment(&mut market.world, params);
        market
    }

    /// Also write every event to a JSONL log
    pub fn with_event_log(mut self, logger: EventLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Log progress every `interval` rounds; 0 disables it
    pub fn with_report_interval(mut self, interval: u64) -> Self {
        self.report_interval = interval;
        self
    }

    /// Replace the random source
    pub fn set_rng(&mut self, rng: SimRng) {
        self.world.insert_resource(rng);
    }

    pub fn spawn_firm(&mut self, firm: Firm) -> Entity {
        self.world
            .resource_mut::<MarketHistory>()
            .profits
            .entry(firm.id.0)
            .or_default();
        self.world.spawn(firm).id()
    }

    /// Add a worker. Employment is set up separately with `employ`.
    pub fn spawn_worker(&mut self, mut worker: Worker) -> Entity {
        worker.employer = None;
        self.world.resource_mut::<WorkerIdAllocator>().reserve(worker.id);
        self.world.spawn(worker).id()
    }

    /// Put a worker on a firm's payroll, updating both sides of the relation.
    /// Returns false if either entity is missing.
    pub fn employ(&mut self, worker: Entity, firm: Entity) -> bool {
        if self.world.get::<Firm>(firm).is_none() {
            return false;
        }
        let Some(mut w) = self.world.get_mut::<Worker>(worker) else {
            return false;
        };
        let previous = w.employer.replace(firm);

        if let Some(previous) = previous {
            if let Some(mut old) = self.world.get_mut::<Firm>(previous) {
                old.remove_employee(worker);
            }
        }
        if let Some(mut new) = self.world.get_mut::<Firm>(firm) {
            new.admit(worker);
        }
        true
    }

    /// Run one full round
    pub fn run_round(&mut self) {
        let round = self.next_round;
        self.world.resource_mut::<RoundClock>().round = round;
        self.world.resource_mut::<RoundEvents>().begin_round(round);

        self.pipeline.run_round(&mut self.world);

        let events = self.world.resource_mut::<RoundEvents>().drain();
        self.stats.record_round(round, &events);
        if let Some(logger) = &mut self.logger {
            if let Err(e) = logger.log_batch(&events) {
                tracing::warn!("Failed to log events for round {}: {}", round, e);
            }
        }

        if cfg!(debug_assertions) {
            if let Err(violation) = self.verify_invariants() {
                tracing::warn!("Invariant violated after round {}: {}", round, violation);
            }
        }

        if self.report_interval > 0 && (round + 1) % self.report_interval == 0 {
            tracing::info!(
                "Round {} ({}): unemployment {:.2}%, {} events",
                round,
                labor_events::MarketDate::from_round(round),
                self.history().latest_unemployment().unwrap_or(0.0),
                events.len()
            );
        }

        self.next_round += 1;
    }

    /// Run `rounds` rounds and return the recorded history
    pub fn run_simulation(&mut self, rounds: u64) -> &SimulationHistory {
        let firms = self.firm_entities().len();
        let workers = self.population();
        tracing::info!(
            "Running {} rounds from round {} ({} firms, {} workers)",
            rounds,
            self.next_round,
            firms,
            workers
        );
        for _ in 0..rounds {
            self.run_round();
        }
        if let Some(logger) = &mut self.logger {
            if let Err(e) = logger.flush() {
                tracing::warn!("Failed to flush event log: {}", e);
            }
        }
        tracing::info!(
            "Simulation complete after {} rounds, unemployment {:.2}%",
            self.next_round,
            self.history().latest_unemployment().unwrap_or(0.0)
        );
        self.history()
    }

    /// Run a single phase outside a full round. Its events stay pending
    /// until `take_events` or the next `run_round`.
    pub fn run_phase(&mut self, phase: Phase) -> bool {
        self.world
            .resource_mut::<RoundEvents>()
            .begin_round(self.next_round);
        self.pipeline.run_phase(phase, &mut self.world)
    }

    /// Drain events not yet handed to the log
    pub fn take_events(&mut self) -> Vec<MarketEvent> {
        self.world.resource_mut::<RoundEvents>().drain()
    }

    pub fn firm(&self, entity: Entity) -> Option<&Firm> {
        self.world.get::<Firm>(entity)
    }

    pub fn worker(&self, entity: Entity) -> Option<&Worker> {
        self.world.get::<Worker>(entity)
    }

    /// Firm entities in firm id order
    pub fn firm_entities(&mut self) -> Vec<Entity> {
        let mut firms: Vec<(FirmId, Entity)> = self
            .world
            .query::<(Entity, &Firm)>()
            .iter(&self.world)
            .map(|(entity, firm)| (firm.id, entity))
            .collect();
        firms.sort_unstable_by_key(|(id, _)| *id);
        firms.into_iter().map(|(_, entity)| entity).collect()
    }

    /// Worker entities in worker id order
    pub fn worker_entities(&mut self) -> Vec<Entity> {
        let mut workers: Vec<_> = self
            .world
            .query::<(Entity, &Worker)>()
            .iter(&self.world)
            .map(|(entity, worker)| (worker.id, entity))
            .collect();
        workers.sort_unstable_by_key(|(id, _)| *id);
        workers.into_iter().map(|(_, entity)| entity).collect()
    }

    pub fn firm_by_id(&mut self, id: FirmId) -> Option<Entity> {
        self.world
            .query::<(Entity, &Firm)>()
            .iter(&self.world)
            .find(|(_, firm)| firm.id == id)
            .map(|(entity, _)| entity)
    }

    pub fn population(&mut self) -> usize {
        self.world.query::<&Worker>().iter(&self.world).count()
    }

    /// Current unemployment rate, in percent
    pub fn unemployment_rate(&mut self) -> f64 {
        let mut query = self.world.query::<&Worker>();
        let mut population = 0;
        let mut unemployed = 0;
        for worker in query.iter(&self.world) {
            population += 1;
            if !worker.is_employed() {
                unemployed += 1;
            }
        }
        unemployment_rate(unemployed, population)
    }

    /// Current wage offer of every firm
    pub fn wage_offers(&mut self) -> BTreeMap<u32, f64> {
        self.world
            .query::<&Firm>()
            .iter(&self.world)
            .map(|firm| (firm.id.0, firm.wage_offer))
            .collect()
    }

    pub fn history(&self) -> &SimulationHistory {
        &self.world.resource::<MarketHistory>().0
    }

    pub fn history_mut(&mut self) -> &mut SimulationHistory {
        &mut self.world.resource_mut::<MarketHistory>().into_inner().0
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn summary(&mut self) -> RunSummary {
        let offers = self.wage_offers();
        self.stats.summarize(self.history(), offers)
    }

    /// Number of completed rounds
    pub fn rounds_run(&self) -> u64 {
        self.next_round
    }

    pub fn verify_invariants(&mut self) -> Result<(), InvariantViolation> {
        check_population(&mut self.world)
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::worker::{Education, WorkerId};
    use crate::rng::ScriptedSource;

    fn small_params() -> EnvironmentParams {
        EnvironmentParams {
            num_firms: 3,
            num_workers: 60,
            wage_bounds: (70.0, 130.0),
            experience_bounds: (0.0, 30.0),
            salary_scale: 1.0,
        }
    }

    #[test]
    fn test_environment_starts_empty_histories() {
        let mut market =
            LaborMarket::create_environment(&small_params(), MarketRules::default(), SimRng::seeded(1));
        assert_eq!(market.population(), 60);
        assert_eq!(market.firm_entities().len(), 3);
        assert_eq!(market.unemployment_rate(), 100.0);
        assert!(market.history().unemployment.is_empty());
        assert_eq!(market.history().profits.len(), 3);
        assert!(market.history().profits.values().all(Vec::is_empty));
    }

    #[test]
    fn test_histories_grow_one_entry_per_round() {
        let mut market =
            LaborMarket::create_environment(&small_params(), MarketRules::default(), SimRng::seeded(2));
        let history = market.run_simulation(12);
        assert_eq!(history.unemployment.len(), 12);
        assert_eq!(history.firm_stats.len(), 12);
        assert!(history.profits.values().all(|p| p.len() == 12));
        assert_eq!(market.rounds_run(), 12);
        assert_eq!(market.stats().rounds, 12);
        assert_eq!(market.population(), 60);
        assert_eq!(market.verify_invariants(), Ok(()));
    }

    #[test]
    fn test_run_simulation_resumes_from_next_round() {
        let mut market =
            LaborMarket::create_environment(&small_params(), MarketRules::default(), SimRng::seeded(4));
        market.run_simulation(4);
        let history = market.run_simulation(8);
        assert_eq!(history.unemployment.len(), 12);
        assert_eq!(market.rounds_run(), 12);
        assert_eq!(market.population(), 60);
    }

    #[test]
    fn test_employ_moves_between_firms() {
        let mut market = LaborMarket::new(MarketRules::default(), SimRng::new(ScriptedSource::constant(0.5)));
        let a = market.spawn_firm(Firm::new(FirmId(0), 100.0));
        let b = market.spawn_firm(Firm::new(FirmId(1), 110.0));
        let w = market.spawn_worker(Worker::new(WorkerId(4), Education::Master, 90.0, 1.0, 2.0, 0.5));

        assert!(market.employ(w, a));
        assert!(market.employ(w, b));
        assert!(market.firm(a).unwrap().employees.is_empty());
        assert_eq!(market.firm(b).unwrap().employees, vec![w]);
        assert_eq!(market.worker(w).unwrap().employer, Some(b));
        assert_eq!(market.verify_invariants(), Ok(()));

        assert!(!market.employ(w, w));
        assert_eq!(
            market.world().resource::<WorkerIdAllocator>().peek(),
            WorkerId(5)
        );
    }

    #[test]
    fn test_run_phase_keeps_events_pending() {
        let mut market = LaborMarket::new(MarketRules::default(), SimRng::new(ScriptedSource::new([0.0, 0.0])));
        let firm = market.spawn_firm(Firm::new(FirmId(0), 100.0));
        let w = market.spawn_worker(Worker::new(WorkerId(0), Education::Bachelor, 90.0, 1.0, 2.0, 0.5));

        assert!(market.run_phase(Phase::Hiring));
        assert_eq!(market.worker(w).unwrap().employer, Some(firm));

        let events = market.take_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind.label(), "hired");
        assert!(market.take_events().is_empty());
    }
}
