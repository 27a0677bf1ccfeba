//! Worker Sampling
//!
//! Fresh workers with a randomized education, wage and productivity profile,
//! and the id allocator that numbers them.

use bevy_ecs::prelude::*;

use crate::components::worker::{Education, Worker, WorkerId};
use crate::rng::{round2, RandomSource};

/// Sampling ranges for new workers
pub mod profile_constants {
    /// Base reservation wage range before the education bonus
    pub const BASE_WAGE_RANGE: (f64, f64) = (25.0, 175.0);
    /// Base productivity range before education and experience bonuses
    pub const BASE_PRODUCTIVITY_RANGE: (f64, f64) = (0.85, 1.15);
    /// Productivity gained per year of prior experience
    pub const EXPERIENCE_PRODUCTIVITY_BONUS: f64 = 0.01;
    pub const LOYALTY_RANGE: (f64, f64) = (0.5, 1.0);
}

use profile_constants::*;

/// Samples an unemployed worker.
///
/// Draw order: education, base wage, base productivity, loyalty.
pub fn sample_worker(
    id: WorkerId,
    years_experience: f64,
    salary_scale: f64,
    rng: &mut dyn RandomSource,
) -> Worker {
    let education = Education::sample(rng);
    let base_wage = round2(rng.uniform(BASE_WAGE_RANGE.0, BASE_WAGE_RANGE.1));
    let reservation_wage = (base_wage + education.wage_bonus()) * salary_scale;

    let base_productivity =
        round2(rng.uniform(BASE_PRODUCTIVITY_RANGE.0, BASE_PRODUCTIVITY_RANGE.1));
    let productivity = base_productivity
        + education.productivity_bonus()
        + years_experience * EXPERIENCE_PRODUCTIVITY_BONUS;

    let loyalty = rng.uniform(LOYALTY_RANGE.0, LOYALTY_RANGE.1);

    Worker::new(
        id,
        education,
        reservation_wage,
        productivity,
        years_experience,
        loyalty,
    )
}

/// Resource: how replacement workers are sampled
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ReplacementProfile {
    pub salary_scale: f64,
}

impl Default for ReplacementProfile {
    fn default() -> Self {
        Self { salary_scale: 1.0 }
    }
}

impl ReplacementProfile {
    pub fn new(salary_scale: f64) -> Self {
        Self { salary_scale }
    }

    /// A labor-market entrant: no experience, fresh profile
    pub fn sample(&self, id: WorkerId, rng: &mut dyn RandomSource) -> Worker {
        sample_worker(id, 0.0, self.salary_scale, rng)
    }
}

/// Resource: hands out worker ids that are never reused
#[derive(Resource, Debug, Default, Clone)]
pub struct WorkerIdAllocator {
    next: u32,
}

impl WorkerIdAllocator {
    /// Starts numbering at `next`
    pub fn starting_at(next: u32) -> Self {
        Self { next }
    }

    pub fn allocate(&mut self) -> WorkerId {
        let id = WorkerId(self.next);
        self.next += 1;
        id
    }

    /// Makes sure future ids stay above an id assigned elsewhere
    pub fn reserve(&mut self, id: WorkerId) {
        self.next = self.next.max(id.0.saturating_add(1));
    }

    pub fn peek(&self) -> WorkerId {
        WorkerId(self.next)
    }
}
