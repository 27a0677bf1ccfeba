//! Profit & Layoff Phase
//!
//! Firms recompute profit from their current staff, record it, and shed their
//! least productive workers when profit collapses against the recorded peak.

use bevy_ecs::prelude::*;
use labor_events::EventKind;

use super::firms_by_id;
use crate::components::firm::Firm;
use crate::components::worker::Worker;
use crate::config::MarketRules;
use crate::events::RoundEvents;
use crate::output::MarketHistory;

/// System: Recompute profit and apply layoffs, firm by firm
///
/// The round's profit is appended to the history before the peak is read, so
/// the peak always covers at least the current round.
pub fn profit_phase(
    rules: Res<MarketRules>,
    mut history: ResMut<MarketHistory>,
    mut events: ResMut<RoundEvents>,
    mut firms: Query<(Entity, &mut Firm)>,
    mut workers: Query<&mut Worker>,
) {
    let mut laid_off = 0;

    for firm_entity in firms_by_id(firms.iter()) {
        let Ok((_, mut firm)) = firms.get_mut(firm_entity) else {
            continue;
        };

        let profit = firm.calculate_profit(
            firm.employees
                .iter()
                .filter_map(|&employee| workers.get(employee).ok()),
        );
        firm.profit = profit;
        history.record_profit(firm.id.0, profit);

        let peak = history.peak_profit(firm.id.0).unwrap_or(profit);
        let Some(count) = firm.layoff_count(peak, &rules.firm) else {
            continue;
        };

        let removed = firm.layoff_workers(count, |employee| {
            workers
                .get(employee)
                .map(|worker| worker.productivity)
                .unwrap_or(0.0)
        });

        tracing::trace!(
            "{} lays off {} (profit {:.2}, peak {:.2})",
            firm.id,
            removed.len(),
            profit,
            peak
        );

        for employee in removed {
            if let Ok(mut worker) = workers.get_mut(employee) {
                worker.leave_employer();
                laid_off += 1;
                events.push(EventKind::LaidOff {
                    firm_id: firm.id.0,
                    worker_id: worker.id.0,
                    productivity: worker.productivity,
                });
            }
        }
    }

    tracing::debug!("Profit: {} workers laid off", laid_off);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedSource;
    use crate::systems::test_support::*;

    #[test]
    fn test_profit_recorded_from_current_staff() {
        let mut world = world_with(ScriptedSource::constant(0.0));
        let firm = spawn_firm(&mut world, 0, 100.0);
        spawn_employed(&mut world, firm, worker(1, 90.0, 1.2));
        spawn_employed(&mut world, firm, worker(2, 60.0, 0.9));

        run(&mut world, profit_phase);

        let expected = 120.0 + 90.0 - 150.0;
        assert!((world.get::<Firm>(firm).unwrap().profit - expected).abs() < 1e-9);
        let history = world.resource::<MarketHistory>();
        assert_eq!(history.profits[&0].len(), 1);
        assert!((history.profits[&0][0] - expected).abs() < 1e-9);
    }

    #[test]
    fn test_empty_firm_records_zero_and_keeps_staff() {
        let mut world = world_with(ScriptedSource::constant(0.0));
        let firm = spawn_firm(&mut world, 0, 100.0);

        run(&mut world, profit_phase);

        assert_eq!(world.get::<Firm>(firm).unwrap().profit, 0.0);
        assert_eq!(world.resource::<MarketHistory>().profits[&0], vec![0.0]);
    }

    #[test]
    fn test_collapse_lays_off_lowest_productivity() {
        let mut world = world_with(ScriptedSource::constant(0.0));
        let firm = spawn_firm(&mut world, 0, 100.0);
        world
            .resource_mut::<MarketHistory>()
            .record_profit(0, 10_000.0);

        let staff: Vec<Entity> = [1.0, 0.7, 1.3, 0.9]
            .iter()
            .enumerate()
            .map(|(i, &p)| spawn_employed(&mut world, firm, worker(i as u32, 95.0, p)))
            .collect();

        run(&mut world, profit_phase);

        let f = world.get::<Firm>(firm).unwrap();
        assert_eq!(f.headcount(), 3);
        assert!(!f.employs(staff[1]));
        assert!(!world.get::<Worker>(staff[1]).unwrap().is_employed());
        assert_eq!(world.resource::<RoundEvents>().count("laid_off"), 1);
    }

    #[test]
    fn test_no_layoff_with_single_employee() {
        let mut world = world_with(ScriptedSource::constant(0.0));
        let firm = spawn_firm(&mut world, 0, 100.0);
        world
            .resource_mut::<MarketHistory>()
            .record_profit(0, 10_000.0);
        let w = spawn_employed(&mut world, firm, worker(1, 95.0, 0.5));

        run(&mut world, profit_phase);

        assert_eq!(world.get::<Firm>(firm).unwrap().employees, vec![w]);
    }
}
