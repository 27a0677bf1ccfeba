//! Job Switching Phase
//!
//! Disloyal employees occasionally move to a firm paying a strictly higher
//! offer. Firm lists change in place, so later workers in the same pass see
//! earlier moves.

use bevy_ecs::prelude::*;
use labor_events::EventKind;

use super::{firms_by_id, workers_by_id};
use crate::components::firm::Firm;
use crate::components::worker::Worker;
use crate::config::MarketRules;
use crate::events::RoundEvents;
use crate::rng::SimRng;

/// System: Let each employed worker consider a move, in worker id order
pub fn job_switching_phase(
    rules: Res<MarketRules>,
    mut rng: ResMut<SimRng>,
    mut events: ResMut<RoundEvents>,
    mut firms: Query<(Entity, &mut Firm)>,
    mut workers: Query<(Entity, &mut Worker)>,
) {
    let rng = rng.source();
    let firm_order = firms_by_id(firms.iter());
    let employed = workers_by_id(workers.iter().filter(|(_, worker)| worker.is_employed()));
    let mut switches = 0;

    for worker_entity in employed {
        let Ok((_, mut worker)) = workers.get_mut(worker_entity) else {
            continue;
        };
        let Some(current) = worker.employer else {
            continue;
        };
        if !rng.chance(worker.switch_probability(&rules.worker)) {
            continue;
        }

        let Ok((_, current_firm)) = firms.get(current) else {
            continue;
        };
        let current_offer = current_firm.wage_offer;
        let better: Vec<Entity> = firm_order
            .iter()
            .copied()
            .filter(|&candidate| {
                firms
                    .get(candidate)
                    .is_ok_and(|(_, firm)| firm.wage_offer > current_offer)
            })
            .collect();
        if better.is_empty() {
            continue;
        }
        let target = better[rng.pick(better.len())];

        let Ok([(_, mut from), (_, mut to)]) = firms.get_many_mut([current, target]) else {
            continue;
        };
        if !from.remove_employee(worker_entity) {
            continue;
        }
        to.admit(worker_entity);
        worker.employer = Some(target);
        switches += 1;

        tracing::trace!("{} moves from {} to {}", worker.id, from.id, to.id);
        events.push(EventKind::Switched {
            worker_id: worker.id.0,
            from_firm: from.id.0,
            to_firm: to.id.0,
        });
    }

    tracing::debug!("Switching: {} workers moved", switches);
}
