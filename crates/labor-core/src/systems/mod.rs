//! ECS Systems
//!
//! The round phases: hiring, profit and layoffs, wage and loyalty drift,
//! job switching, retirement and replacement, plus the per-round tallies.

pub mod hiring;
pub mod profit;
pub mod retirement;
pub mod switching;
pub mod tally;
pub mod wages;

use bevy_ecs::prelude::*;

use crate::components::firm::Firm;
use crate::components::worker::Worker;

pub use hiring::{determine_openings, hiring_phase, open_round};
pub use profit::profit_phase;
pub use retirement::retirement_phase;
pub use switching::job_switching_phase;
pub use tally::{record_firm_stats, record_unemployment, unemployment_rate};
pub use wages::wage_update_phase;

/// Resource: the labor force as it stood when the current round opened
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct RoundClock {
    /// 0-based round index
    pub round: u64,
    pub unemployed_at_start: usize,
    pub population_at_start: usize,
}

impl RoundClock {
    /// Unemployed share of the labor force at round start, as a fraction
    pub fn unemployment_fraction(&self) -> f64 {
        if self.population_at_start == 0 {
            0.0
        } else {
            self.unemployed_at_start as f64 / self.population_at_start as f64
        }
    }
}

/// Firm entities sorted by firm id
pub(crate) fn firms_by_id<'a>(firms: impl Iterator<Item = (Entity, &'a Firm)>) -> Vec<Entity> {
    let mut order: Vec<_> = firms.map(|(entity, firm)| (firm.id, entity)).collect();
    order.sort_unstable_by_key(|(id, _)| *id);
    order.into_iter().map(|(_, entity)| entity).collect()
}

/// Worker entities sorted by worker id
pub(crate) fn workers_by_id<'a>(
    workers: impl Iterator<Item = (Entity, &'a Worker)>,
) -> Vec<Entity> {
    let mut order: Vec<_> = workers.map(|(entity, worker)| (worker.id, entity)).collect();
    order.sort_unstable_by_key(|(id, _)| *id);
    order.into_iter().map(|(_, entity)| entity).collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use bevy_ecs::prelude::*;
    use labor_events::SimulationHistory;

    use super::RoundClock;
    use crate::components::firm::{Firm, FirmId};
    use crate::components::worker::{Education, Worker, WorkerId};
    use crate::config::MarketRules;
    use crate::events::RoundEvents;
    use crate::output::MarketHistory;
    use crate::rng::{RandomSource, SimRng};
    use crate::setup::{ReplacementProfile, WorkerIdAllocator};

    /// A world with every resource the phases read
    pub fn world_with(source: impl RandomSource) -> World {
        let mut world = World::new();
        world.insert_resource(MarketRules::default());
        world.insert_resource(SimRng::new(source));
        world.insert_resource(RoundEvents::new());
        world.insert_resource(RoundClock::default());
        world.insert_resource(MarketHistory(SimulationHistory::default()));
        world.insert_resource(ReplacementProfile::default());
        world.insert_resource(WorkerIdAllocator::starting_at(1000));
        world
    }

    pub fn worker(id: u32, reservation_wage: f64, productivity: f64) -> Worker {
        Worker::new(WorkerId(id), Education::Bachelor, reservation_wage, productivity, 5.0, 0.5)
    }

    pub fn spawn_firm(world: &mut World, id: u32, wage_offer: f64) -> Entity {
        world.spawn(Firm::new(FirmId(id), wage_offer)).id()
    }

    /// Spawns a worker already on the firm's payroll
    pub fn spawn_employed(world: &mut World, firm: Entity, mut worker: Worker) -> Entity {
        worker.employer = Some(firm);
        let entity = world.spawn(worker).id();
        if let Some(mut f) = world.get_mut::<Firm>(firm) {
            f.employees.push(entity);
        }
        entity
    }

    pub fn run<M>(world: &mut World, systems: impl IntoSystemConfigs<M>) {
        let mut schedule = Schedule::default();
        schedule.add_systems(systems);
        schedule.run(world);
    }
}
