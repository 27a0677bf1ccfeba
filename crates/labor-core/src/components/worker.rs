//! Worker Components
//!
//! A worker's economic attributes and the per-worker decision rules:
//! job acceptance, wage and loyalty drift, switching, aging, retirement.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::WorkerRules;
use crate::rng::RandomSource;

/// Unique identifier for a worker within the running pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WorkerId(pub u32);

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "worker_{:05}", self.0)
    }
}

/// Highest completed education, in ascending order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Education {
    HighSchool,
    Associate,
    Bachelor,
    Master,
    PhD,
}

impl Education {
    pub const ALL: [Education; 5] = [
        Education::HighSchool,
        Education::Associate,
        Education::Bachelor,
        Education::Master,
        Education::PhD,
    ];

    /// Level by index, clamping past the top
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index.min(Self::ALL.len() - 1)]
    }

    /// Draws a level from a triangular distribution peaking at Bachelor
    pub fn sample(rng: &mut dyn RandomSource) -> Self {
        let top = (Self::ALL.len() - 1) as f64;
        let x = rng.triangular(0.0, top, 2.0);
        Self::from_index(x.round() as usize)
    }

    /// Added to the sampled base reservation wage
    pub fn wage_bonus(self) -> f64 {
        match self {
            Education::HighSchool => 0.0,
            Education::Associate => 10.0,
            Education::Bachelor => 25.0,
            Education::Master => 45.0,
            Education::PhD => 70.0,
        }
    }

    /// Added to the sampled base productivity
    pub fn productivity_bonus(self) -> f64 {
        match self {
            Education::HighSchool => -0.1,
            Education::Associate => -0.05,
            Education::Bachelor => 0.0,
            Education::Master => 0.1,
            Education::PhD => 0.15,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Education::HighSchool => "High School",
            Education::Associate => "Associate",
            Education::Bachelor => "Bachelor",
            Education::Master => "Master",
            Education::PhD => "PhD",
        }
    }
}

impl fmt::Display for Education {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Component: a member of the labor force
///
/// `employer` is a lookup key into the firm population. The firm's employee
/// list owns the relation; every site that changes one side changes the other.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Worker {
    pub id: WorkerId,
    pub education: Education,
    /// Lowest wage offer this worker will accept
    pub reservation_wage: f64,
    pub productivity: f64,
    pub years_experience: f64,
    /// 0.0 to 1.0
    pub loyalty: f64,
    pub employer: Option<Entity>,
}

impl Worker {
    /// An unemployed worker with the given attributes
    pub fn new(
        id: WorkerId,
        education: Education,
        reservation_wage: f64,
        productivity: f64,
        years_experience: f64,
        loyalty: f64,
    ) -> Self {
        Self {
            id,
            education,
            reservation_wage,
            productivity,
            years_experience,
            loyalty: loyalty.clamp(0.0, 1.0),
            employer: None,
        }
    }

    pub fn is_employed(&self) -> bool {
        self.employer.is_some()
    }

    /// Accepts iff the offer meets the reservation wage
    pub fn accept_job(&mut self, firm: Entity, wage_offer: f64) -> bool {
        if wage_offer >= self.reservation_wage {
            self.employer = Some(firm);
            true
        } else {
            false
        }
    }

    /// Clears the employment link, returning the former employer
    pub fn leave_employer(&mut self) -> Option<Entity> {
        self.employer.take()
    }

    /// Monthly drift of reservation wage and loyalty
    pub fn update(&mut self, rules: &WorkerRules) {
        if self.is_employed() {
            self.reservation_wage *= rules.employed_wage_growth;
            self.loyalty = (self.loyalty + rules.loyalty_step).min(1.0);
        } else {
            self.reservation_wage *= rules.unemployed_wage_decay;
            self.loyalty = (self.loyalty - rules.loyalty_step).max(0.0);
        }
    }

    /// True when the reservation wage has outgrown the employer's offer
    pub fn wants_to_quit(&self, wage_offer: f64) -> bool {
        self.is_employed() && self.reservation_wage > wage_offer
    }

    /// Per-round probability of looking for a better-paying firm
    pub fn switch_probability(&self, rules: &WorkerRules) -> f64 {
        ((1.0 - self.loyalty) * rules.switch_propensity).clamp(0.0, 1.0)
    }

    /// One month of experience and learning-by-doing
    pub fn age_one_period(&mut self, rules: &WorkerRules) {
        self.years_experience += 1.0 / 12.0;
        self.productivity *= rules.monthly_productivity_growth;
    }

    pub fn should_retire(&self, rules: &WorkerRules) -> bool {
        self.years_experience >= rules.retirement_years
    }
}
