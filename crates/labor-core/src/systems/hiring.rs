//! Hiring Phase
//!
//! Each firm posts a number of openings that depends on how tight the labor
//! market was when the round opened, then fills them from the unemployed pool.

use bevy_ecs::prelude::*;
use labor_events::EventKind;

use super::{firms_by_id, RoundClock};
use crate::components::firm::Firm;
use crate::components::worker::Worker;
use crate::config::{HiringRules, MarketRules};
use crate::events::RoundEvents;
use crate::rng::{RandomSource, SimRng};

/// Number of openings a firm posts this round.
///
/// `unemployment` is a fraction, not a percentage.
pub fn determine_openings(
    unemployment: f64,
    rules: &HiringRules,
    rng: &mut dyn RandomSource,
) -> usize {
    if unemployment < rules.tight_market_rate {
        rng.range_inclusive(rules.tight_min_openings, rules.tight_max_openings)
    } else {
        rng.range_inclusive(rules.min_openings, rules.max_openings)
    }
}

/// System: Record the labor force as the round opens
pub fn open_round(mut clock: ResMut<RoundClock>, workers: Query<&Worker>) {
    let mut population = 0;
    let mut unemployed = 0;
    for worker in workers.iter() {
        population += 1;
        if !worker.is_employed() {
            unemployed += 1;
        }
    }
    clock.population_at_start = population;
    clock.unemployed_at_start = unemployed;
}

/// System: Fill openings firm by firm, in firm id order
///
/// Every opening draws one uniformly random unemployed worker. A rejected
/// offer raises the firm's wage offer before its next opening. Openings left
/// when nobody is unemployed are skipped.
pub fn hiring_phase(
    clock: Res<RoundClock>,
    rules: Res<MarketRules>,
    mut rng: ResMut<SimRng>,
    mut events: ResMut<RoundEvents>,
    mut firms: Query<(Entity, &mut Firm)>,
    mut workers: Query<(Entity, &mut Worker)>,
) {
    let unemployment = clock.unemployment_fraction();
    let rng = rng.source();

    let mut pool: Vec<Entity> = workers
        .iter()
        .filter(|(_, worker)| !worker.is_employed())
        .map(|(entity, _)| entity)
        .collect();

    let mut hires = 0;
    let mut rejections = 0;

    for firm_entity in firms_by_id(firms.iter()) {
        let openings = determine_openings(unemployment, &rules.hiring, rng);

        for _ in 0..openings {
            if pool.is_empty() {
                continue;
            }
            let index = rng.pick(pool.len());
            let candidate = pool[index];

            let Ok((_, mut worker)) = workers.get_mut(candidate) else {
                continue;
            };
            let Ok((_, mut firm)) = firms.get_mut(firm_entity) else {
                continue;
            };

            let offer = firm.wage_offer;
            if firm.hire(firm_entity, candidate, &mut worker, &rules.firm) {
                pool.swap_remove(index);
                hires += 1;
                tracing::trace!("{} hired {} at {:.2}", firm.id, worker.id, offer);
                events.push(EventKind::Hired {
                    firm_id: firm.id.0,
                    worker_id: worker.id.0,
                    wage_offer: offer,
                });
            } else {
                rejections += 1;
                events.push(EventKind::OfferRaised {
                    firm_id: firm.id.0,
                    rejected_by: worker.id.0,
                    previous_offer: offer,
                    new_offer: firm.wage_offer,
                });
            }
        }
    }

    tracing::debug!(
        "Hiring: {} hires, {} rejected offers, unemployment at open {:.2}%",
        hires,
        rejections,
        unemployment * 100.0
    );
}
