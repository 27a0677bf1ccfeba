//! Population Invariants
//!
//! The employment relation must agree from both sides, loyalty must stay in
//! range, and ids must be unique within each population.

use bevy_ecs::prelude::*;
use std::collections::{HashMap, HashSet};

use crate::components::firm::{Firm, FirmId};
use crate::components::worker::{Worker, WorkerId};

/// A broken population invariant
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("{worker} names an employer that is not a firm")]
    EmployerMissing { worker: WorkerId },
    #[error("{worker} names {firm} as employer but is not on its payroll")]
    NotOnPayroll { worker: WorkerId, firm: FirmId },
    #[error("{firm} lists an employee that is not a worker")]
    UnknownEmployee { firm: FirmId },
    #[error("{firm} lists {worker}, whose employer is elsewhere")]
    EmployerMismatch { firm: FirmId, worker: WorkerId },
    #[error("{worker} appears on {count} payrolls")]
    MultipleEmployers { worker: WorkerId, count: usize },
    #[error("{worker} has loyalty {loyalty} outside [0, 1]")]
    LoyaltyOutOfRange { worker: WorkerId, loyalty: f64 },
    #[error("duplicate worker id {0}")]
    DuplicateWorkerId(WorkerId),
    #[error("duplicate firm id {0}")]
    DuplicateFirmId(FirmId),
}

/// Check every population invariant, returning the first violation found
pub fn check_population(world: &mut World) -> Result<(), InvariantViolation> {
    let mut firm_query = world.query::<(Entity, &Firm)>();
    let mut worker_query = world.query::<(Entity, &Worker)>();
    let world: &World = world;

    let mut firms: Vec<(Entity, &Firm)> = firm_query.iter(world).collect();
    firms.sort_by_key(|(_, firm)| firm.id);
    let mut workers: Vec<(Entity, &Worker)> = worker_query.iter(world).collect();
    workers.sort_by_key(|(_, worker)| worker.id);

    for pair in firms.windows(2) {
        if pair[0].1.id == pair[1].1.id {
            return Err(InvariantViolation::DuplicateFirmId(pair[0].1.id));
        }
    }
    for pair in workers.windows(2) {
        if pair[0].1.id == pair[1].1.id {
            return Err(InvariantViolation::DuplicateWorkerId(pair[0].1.id));
        }
    }

    let worker_of: HashMap<Entity, &Worker> = workers.iter().copied().collect();
    let firm_of: HashMap<Entity, &Firm> = firms.iter().copied().collect();

    // every payroll entry is a worker, listed once across all firms
    let mut payrolls: HashMap<Entity, usize> = HashMap::new();
    for (_, firm) in &firms {
        for employee in &firm.employees {
            if !worker_of.contains_key(employee) {
                return Err(InvariantViolation::UnknownEmployee { firm: firm.id });
            }
            *payrolls.entry(*employee).or_insert(0) += 1;
        }
    }

    let mut on_payroll: HashSet<(Entity, Entity)> = HashSet::new();
    for (firm_entity, firm) in &firms {
        for employee in &firm.employees {
            on_payroll.insert((*firm_entity, *employee));
        }
    }

    for (entity, worker) in &workers {
        if !(0.0..=1.0).contains(&worker.loyalty) {
            return Err(InvariantViolation::LoyaltyOutOfRange {
                worker: worker.id,
                loyalty: worker.loyalty,
            });
        }

        let count = payrolls.get(entity).copied().unwrap_or(0);
        if count > 1 {
            return Err(InvariantViolation::MultipleEmployers {
                worker: worker.id,
                count,
            });
        }

        if let Some(employer) = worker.employer {
            let firm = firm_of
                .get(&employer)
                .ok_or(InvariantViolation::EmployerMissing { worker: worker.id })?;
            if !on_payroll.contains(&(employer, *entity)) {
                return Err(InvariantViolation::NotOnPayroll {
                    worker: worker.id,
                    firm: firm.id,
                });
            }
        }
    }

    // listed at one firm while naming another
    for (firm_entity, firm) in &firms {
        for employee in &firm.employees {
            if let Some(worker) = worker_of.get(employee) {
                if worker.employer != Some(*firm_entity) {
                    return Err(InvariantViolation::EmployerMismatch {
                        firm: firm.id,
                        worker: worker.id,
                    });
                }
            }
        }
    }

    Ok(())
}
