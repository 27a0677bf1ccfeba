//! Wage & Loyalty Phase
//!
//! Reservation wages and loyalty drift with employment status. A worker whose
//! reservation wage outgrows the employer's offer quits on the spot.

use bevy_ecs::prelude::*;
use labor_events::EventKind;

use super::workers_by_id;
use crate::components::firm::Firm;
use crate::components::worker::Worker;
use crate::config::MarketRules;
use crate::events::RoundEvents;

/// System: Update every worker, then apply quits
pub fn wage_update_phase(
    rules: Res<MarketRules>,
    mut events: ResMut<RoundEvents>,
    mut firms: Query<&mut Firm>,
    mut workers: Query<(Entity, &mut Worker)>,
) {
    let mut quits = 0;

    for worker_entity in workers_by_id(workers.iter()) {
        let Ok((_, mut worker)) = workers.get_mut(worker_entity) else {
            continue;
        };
        worker.update(&rules.worker);

        let Some(employer) = worker.employer else {
            continue;
        };
        let Ok(mut firm) = firms.get_mut(employer) else {
            continue;
        };
        if !worker.wants_to_quit(firm.wage_offer) {
            continue;
        }

        firm.remove_employee(worker_entity);
        worker.leave_employer();
        quits += 1;
        events.push(EventKind::Quit {
            firm_id: firm.id.0,
            worker_id: worker.id.0,
            reservation_wage: worker.reservation_wage,
            wage_offer: firm.wage_offer,
        });
    }

    tracing::debug!("Wages: {} quits", quits);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedSource;
    use crate::systems::test_support::*;

    #[test]
    fn test_drift_by_employment_status() {
        let mut world = world_with(ScriptedSource::constant(0.0));
        let firm = spawn_firm(&mut world, 0, 200.0);
        let employed = spawn_employed(&mut world, firm, worker(1, 100.0, 1.0));
        let idle = world.spawn(worker(2, 100.0, 1.0)).id();

        run(&mut world, wage_update_phase);

        let e = world.get::<Worker>(employed).unwrap();
        assert!((e.reservation_wage - 100.5).abs() < 1e-9);
        assert!((e.loyalty - 0.51).abs() < 1e-12);

        let u = world.get::<Worker>(idle).unwrap();
        assert!((u.reservation_wage - 95.0).abs() < 1e-9);
        assert!((u.loyalty - 0.49).abs() < 1e-12);
    }

    #[test]
    fn test_quit_when_reservation_exceeds_offer() {
        let mut world = world_with(ScriptedSource::constant(0.0));
        let firm = spawn_firm(&mut world, 0, 100.0);
        // 99.6 * 1.005 = 100.098 > 100
        let leaver = spawn_employed(&mut world, firm, worker(1, 99.6, 1.0));
        let stayer = spawn_employed(&mut world, firm, worker(2, 99.4, 1.0));

        run(&mut world, wage_update_phase);

        assert_eq!(world.get::<Firm>(firm).unwrap().employees, vec![stayer]);
        assert!(!world.get::<Worker>(leaver).unwrap().is_employed());
        assert_eq!(world.get::<Worker>(stayer).unwrap().employer, Some(firm));
        assert_eq!(world.resource::<RoundEvents>().count("quit"), 1);
    }
}
