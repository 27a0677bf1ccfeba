//! Retirement & Replacement Phase
//!
//! Every worker ages one month. Workers past the career length leave the labor
//! force, and the same number of fresh entrants replace them.

use bevy_ecs::prelude::*;
use labor_events::EventKind;

use super::workers_by_id;
use crate::components::firm::Firm;
use crate::components::worker::Worker;
use crate::config::MarketRules;
use crate::events::RoundEvents;
use crate::rng::SimRng;
use crate::setup::{ReplacementProfile, WorkerIdAllocator};

/// System: Age workers, retire the eligible, spawn replacements
///
/// Despawns and spawns are deferred commands, applied when the phase ends, so
/// the population size is the same before and after the phase.
pub fn retirement_phase(
    mut commands: Commands,
    rules: Res<MarketRules>,
    profile: Res<ReplacementProfile>,
    mut ids: ResMut<WorkerIdAllocator>,
    mut rng: ResMut<SimRng>,
    mut events: ResMut<RoundEvents>,
    mut firms: Query<&mut Firm>,
    mut workers: Query<(Entity, &mut Worker)>,
) {
    let mut retired = 0;

    for worker_entity in workers_by_id(workers.iter()) {
        let Ok((_, mut worker)) = workers.get_mut(worker_entity) else {
            continue;
        };
        worker.age_one_period(&rules.worker);
        if !worker.should_retire(&rules.worker) {
            continue;
        }

        let mut firm_id = None;
        if let Some(employer) = worker.leave_employer() {
            if let Ok(mut firm) = firms.get_mut(employer) {
                firm.remove_employee(worker_entity);
                firm_id = Some(firm.id.0);
            }
        }

        events.push(EventKind::Retired {
            worker_id: worker.id.0,
            firm_id,
            years_experience: worker.years_experience,
        });
        commands.entity(worker_entity).despawn();
        retired += 1;
    }

    let rng = rng.source();
    for _ in 0..retired {
        let entrant = profile.sample(ids.allocate(), rng);
        events.push(EventKind::Entered {
            worker_id: entrant.id.0,
            education: entrant.education.label().to_string(),
            reservation_wage: entrant.reservation_wage,
        });
        commands.spawn(entrant);
    }

    tracing::debug!("Retirement: {} retired and replaced", retired);
}
