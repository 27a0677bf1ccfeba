//! Round Tallies
//!
//! End-of-round measurements: the unemployment rate over the post-replacement
//! population and the per-firm headcount / mean salary snapshot.

use bevy_ecs::prelude::*;
use labor_events::{FirmRoundStats, FirmStatsSnapshot};

use crate::components::firm::Firm;
use crate::components::worker::Worker;
use crate::output::MarketHistory;

/// Unemployed share of the population, in percent. An empty population has
/// no unemployment.
pub fn unemployment_rate(unemployed: usize, population: usize) -> f64 {
    if population == 0 {
        return 0.0;
    }
    100.0 * unemployed as f64 / population as f64
}

/// System: Append this round's unemployment rate to the history
pub fn record_unemployment(mut history: ResMut<MarketHistory>, workers: Query<&Worker>) {
    let population = workers.iter().count();
    let unemployed = workers.iter().filter(|w| !w.is_employed()).count();
    let rate = unemployment_rate(unemployed, population);
    history.record_unemployment(rate);
    tracing::debug!("Unemployment: {:.2}% of {}", rate, population);
}

/// System: Snapshot headcount and mean reservation wage of every firm
pub fn record_firm_stats(
    mut history: ResMut<MarketHistory>,
    firms: Query<&Firm>,
    workers: Query<&Worker>,
) {
    let snapshot: FirmStatsSnapshot = firms
        .iter()
        .map(|firm| {
            let salaries: Vec<f64> = firm
                .employees
                .iter()
                .filter_map(|&employee| workers.get(employee).ok())
                .map(|worker| worker.reservation_wage)
                .collect();
            (firm.id.0, FirmRoundStats::from_salaries(&salaries))
        })
        .collect();
    history.record_firm_stats(snapshot);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedSource;
    use crate::systems::test_support::*;

    #[test]
    fn test_unemployment_rate_boundaries() {
        assert_eq!(unemployment_rate(0, 50), 0.0);
        assert_eq!(unemployment_rate(50, 50), 100.0);
        assert_eq!(unemployment_rate(1, 4), 25.0);
        assert_eq!(unemployment_rate(0, 0), 0.0);
    }

    #[test]
    fn test_record_unemployment() {
        let mut world = world_with(ScriptedSource::constant(0.0));
        let firm = spawn_firm(&mut world, 0, 100.0);
        spawn_employed(&mut world, firm, worker(1, 90.0, 1.0));
        world.spawn(worker(2, 90.0, 1.0));

        run(&mut world, record_unemployment);

        assert_eq!(world.resource::<MarketHistory>().unemployment, vec![50.0]);
    }

    #[test]
    fn test_firm_stats_snapshot() {
        let mut world = world_with(ScriptedSource::constant(0.0));
        let busy = spawn_firm(&mut world, 0, 100.0);
        spawn_firm(&mut world, 1, 100.0);
        spawn_employed(&mut world, busy, worker(1, 80.0, 1.0));
        spawn_employed(&mut world, busy, worker(2, 100.0, 1.0));

        run(&mut world, record_firm_stats);

        let history = world.resource::<MarketHistory>();
        let snapshot = &history.firm_stats[0];
        assert_eq!(snapshot[&0], FirmRoundStats::new(2, 90.0));
        assert_eq!(snapshot[&1], FirmRoundStats::new(0, 0.0));
    }
}
