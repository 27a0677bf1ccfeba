//! Environment Setup
//!
//! Spawns the initial firms and workers and the resources that track them.

use bevy_ecs::prelude::*;
use labor_events::SimulationHistory;

use super::population::{sample_worker, ReplacementProfile, WorkerIdAllocator};
use crate::components::firm::{Firm, FirmId};
use crate::components::worker::WorkerId;
use crate::config::Config;
use crate::output::MarketHistory;
use crate::rng::{round2, RandomSource, SimRng};

/// Parameters for building the initial population
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentParams {
    pub num_firms: usize,
    pub num_workers: usize,
    /// Initial firm wage offers are drawn from this range before scaling
    pub wage_bounds: (f64, f64),
    /// Initial worker experience in years
    pub experience_bounds: (f64, f64),
    pub salary_scale: f64,
}

impl Default for EnvironmentParams {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl EnvironmentParams {
    pub fn from_config(config: &Config) -> Self {
        let env = &config.environment;
        Self {
            num_firms: config.simulation.num_firms,
            num_workers: config.simulation.num_workers,
            wage_bounds: (env.min_wage, env.max_wage),
            experience_bounds: (env.min_experience, env.max_experience),
            salary_scale: env.salary_scale,
        }
    }

    pub fn with_salary_scale(mut self, salary_scale: f64) -> Self {
        self.salary_scale = salary_scale;
        self
    }
}

/// Summary of a freshly built environment
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentSummary {
    pub firms: usize,
    pub workers: usize,
    pub mean_wage_offer: f64,
}

/// Spawn firms, then workers, drawing from the `SimRng` resource.
///
/// Inserts an empty `MarketHistory` keyed by the new firm ids, the
/// `WorkerIdAllocator` starting after the initial workers, and an unscaled
/// `ReplacementProfile`. The salary scale applies to the initial population only.
pub fn create_environment(world: &mut World, params: &EnvironmentParams) -> EnvironmentSummary {
    let (firm_ids, wage_total) = world.resource_scope(|world, mut rng: Mut<SimRng>| {
        let rng = rng.source();
        let firm_ids = spawn_firms(world, params, rng);
        spawn_workers(world, params, rng);
        let wage_total: f64 = world
            .query::<&Firm>()
            .iter(world)
            .map(|firm| firm.wage_offer)
            .sum();
        (firm_ids, wage_total)
    });

    world.insert_resource(MarketHistory(SimulationHistory::new(firm_ids.iter().copied())));
    world.insert_resource(WorkerIdAllocator::starting_at(params.num_workers as u32));
    world.insert_resource(ReplacementProfile::default());

    let summary = EnvironmentSummary {
        firms: params.num_firms,
        workers: params.num_workers,
        mean_wage_offer: if params.num_firms == 0 {
            0.0
        } else {
            wage_total / params.num_firms as f64
        },
    };
    tracing::info!(
        "Created {} firms and {} workers (salary scale {}, mean offer {:.2})",
        summary.firms,
        summary.workers,
        params.salary_scale,
        summary.mean_wage_offer
    );
    summary
}

fn spawn_firms(world: &mut World, params: &EnvironmentParams, rng: &mut dyn RandomSource) -> Vec<u32> {
    let (low, high) = params.wage_bounds;
    (0..params.num_firms as u32)
        .map(|id| {
            let wage_offer = round2(rng.uniform(low, high) * params.salary_scale);
            world.spawn(Firm::new(FirmId(id), wage_offer));
            id
        })
        .collect()
}

fn spawn_workers(world: &mut World, params: &EnvironmentParams, rng: &mut dyn RandomSource) {
    let (low, high) = params.experience_bounds;
    for id in 0..params.num_workers as u32 {
        let years_experience = round2(rng.uniform(low, high));
        let worker = sample_worker(WorkerId(id), years_experience, params.salary_scale, rng);
        world.spawn(worker);
    }
}
