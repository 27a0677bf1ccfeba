//! Firm Components
//!
//! Firms own their employee lists and decide on hiring offers, profit and layoffs.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::worker::Worker;
use crate::config::FirmRules;

/// Unique identifier for a firm, fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FirmId(pub u32);

impl fmt::Display for FirmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "firm_{:03}", self.0)
    }
}

/// Component: an employer
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Firm {
    pub id: FirmId,
    /// Wage paid per unit of effective productivity; only ever raised
    pub wage_offer: f64,
    /// Employees in hiring order (layoffs re-sort by productivity)
    pub employees: Vec<Entity>,
    /// Profit of the latest round, not accumulated
    pub profit: f64,
}

impl Firm {
    pub fn new(id: FirmId, wage_offer: f64) -> Self {
        Self {
            id,
            wage_offer,
            employees: Vec::new(),
            profit: 0.0,
        }
    }

    pub fn headcount(&self) -> usize {
        self.employees.len()
    }

    pub fn employs(&self, worker: Entity) -> bool {
        self.employees.contains(&worker)
    }

    /// Offers the current wage to a candidate.
    ///
    /// On acceptance the candidate joins the employee list. On rejection the
    /// offer is raised for the next attempt.
    pub fn hire(
        &mut self,
        this_firm: Entity,
        candidate: Entity,
        worker: &mut Worker,
        rules: &FirmRules,
    ) -> bool {
        if worker.accept_job(this_firm, self.wage_offer) {
            self.employees.push(candidate);
            true
        } else {
            self.raise_wage_offer(rules);
            false
        }
    }

    pub fn raise_wage_offer(&mut self, rules: &FirmRules) {
        self.wage_offer *= rules.offer_raise;
    }

    /// Appends a worker who moved here from another firm
    pub fn admit(&mut self, worker: Entity) {
        self.employees.push(worker);
    }

    /// Removes a worker, keeping the order of the rest
    pub fn remove_employee(&mut self, worker: Entity) -> bool {
        match self.employees.iter().position(|&e| e == worker) {
            Some(index) => {
                self.employees.remove(index);
                true
            }
            None => false,
        }
    }

    /// Revenue from employee productivity at the current offer, minus their
    /// reservation wages
    pub fn calculate_profit<'a>(&self, staff: impl IntoIterator<Item = &'a Worker>) -> f64 {
        let (revenue, costs) = staff.into_iter().fold((0.0, 0.0), |(rev, cost), w| {
            (rev + w.productivity * self.wage_offer, cost + w.reservation_wage)
        });
        revenue - costs
    }

    /// How many workers to lay off given the firm's peak profit, if any
    pub fn layoff_count(&self, peak_profit: f64, rules: &FirmRules) -> Option<usize> {
        let threshold = peak_profit * rules.layoff_threshold;
        if self.profit < threshold && self.headcount() > 1 {
            Some((self.headcount() / rules.layoff_divisor).max(1))
        } else {
            None
        }
    }

    /// Removes up to `count` of the least productive employees.
    ///
    /// The employee list is stable-sorted by productivity first, so ties keep
    /// their hiring order. Returns the removed workers; the caller clears their
    /// employment state.
    pub fn layoff_workers(
        &mut self,
        count: usize,
        productivity_of: impl Fn(Entity) -> f64,
    ) -> Vec<Entity> {
        if self.employees.is_empty() {
            return Vec::new();
        }
        self.employees
            .sort_by(|a, b| productivity_of(*a).total_cmp(&productivity_of(*b)));
        let count = count.min(self.employees.len());
        self.employees.drain(..count).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::worker::{Education, WorkerId};
    use std::collections::HashMap;

    fn worker(id: u32, reservation_wage: f64, productivity: f64) -> Worker {
        Worker::new(WorkerId(id), Education::Bachelor, reservation_wage, productivity, 5.0, 0.5)
    }

    #[test]
    fn test_hire_accepts_and_appends() {
        let mut world = World::new();
        let firm_entity = world.spawn_empty().id();
        let candidate = world.spawn_empty().id();

        let mut firm = Firm::new(FirmId(0), 100.0);
        let mut w = worker(1, 90.0, 1.0);
        assert!(firm.hire(firm_entity, candidate, &mut w, &FirmRules::default()));
        assert_eq!(firm.employees, vec![candidate]);
        assert_eq!(w.employer, Some(firm_entity));
        assert_eq!(firm.wage_offer, 100.0);
    }

    #[test]
    fn test_rejected_hire_raises_offer() {
        let mut world = World::new();
        let firm_entity = world.spawn_empty().id();
        let candidate = world.spawn_empty().id();

        let mut firm = Firm::new(FirmId(0), 100.0);
        let mut w = worker(1, 120.0, 1.0);
        assert!(!firm.hire(firm_entity, candidate, &mut w, &FirmRules::default()));
        assert!(firm.employees.is_empty());
        assert!(!w.is_employed());
        assert!((firm.wage_offer - 105.0).abs() < 1e-9);

        firm.hire(firm_entity, candidate, &mut w, &FirmRules::default());
        assert!((firm.wage_offer - 110.25).abs() < 1e-9);
    }

    #[test]
    fn test_calculate_profit() {
        let firm = Firm::new(FirmId(0), 100.0);
        let staff = [worker(1, 90.0, 1.2), worker(2, 50.0, 0.8)];
        let profit = firm.calculate_profit(staff.iter());
        assert!((profit - (120.0 + 80.0 - 140.0)).abs() < 1e-9);
        assert_eq!(firm.calculate_profit(std::iter::empty()), 0.0);
    }

    #[test]
    fn test_layoff_count() {
        let rules = FirmRules::default();
        let mut world = World::new();
        let mut firm = Firm::new(FirmId(0), 100.0);
        for _ in 0..9 {
            firm.employees.push(world.spawn_empty().id());
        }

        firm.profit = 30.0;
        assert_eq!(firm.layoff_count(100.0, &rules), None);

        firm.profit = 20.0;
        assert_eq!(firm.layoff_count(100.0, &rules), Some(2));

        firm.employees.truncate(2);
        assert_eq!(firm.layoff_count(100.0, &rules), Some(1));

        firm.employees.truncate(1);
        assert_eq!(firm.layoff_count(100.0, &rules), None);
    }

    #[test]
    fn test_layoff_lowest_productivity_first_stable() {
        let mut world = World::new();
        let entities: Vec<Entity> = (0..5).map(|_| world.spawn_empty().id()).collect();
        let productivity: HashMap<Entity, f64> = entities
            .iter()
            .copied()
            .zip([1.1, 0.9, 1.3, 0.9, 1.0])
            .collect();

        let mut firm = Firm::new(FirmId(0), 100.0);
        firm.employees = entities.clone();

        let removed = firm.layoff_workers(3, |e| productivity[&e]);
        assert_eq!(removed, vec![entities[1], entities[3], entities[4]]);
        assert_eq!(firm.employees, vec![entities[0], entities[2]]);

        let removed = firm.layoff_workers(10, |e| productivity[&e]);
        assert_eq!(removed.len(), 2);
        assert!(firm.employees.is_empty());
        assert!(firm.layoff_workers(1, |e| productivity[&e]).is_empty());
    }

    #[test]
    fn test_remove_employee_keeps_order() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();
        let c = world.spawn_empty().id();
        let mut firm = Firm::new(FirmId(0), 100.0);
        firm.employees = vec![a, b, c];

        assert!(firm.remove_employee(b));
        assert_eq!(firm.employees, vec![a, c]);
        assert!(!firm.remove_employee(b));
        firm.admit(b);
        assert_eq!(firm.employees, vec![a, c, b]);
        assert!(firm.employs(b));
    }
}
