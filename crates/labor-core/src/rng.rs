//! Random Draws
//!
//! Every stochastic decision in the market goes through one `RandomSource`
//! held in the `SimRng` resource. Production runs use a seeded `SmallRng`;
//! tests swap in a `ScriptedSource` to force specific outcomes.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// A source of uniform draws in `[0, 1)`.
///
/// All other distributions are derived from `next_unit`, so a scripted source
/// only has to supply unit values to control every decision.
pub trait RandomSource: Send + Sync + 'static {
    fn next_unit(&mut self) -> f64;

    /// Uniform float in `[low, high)`.
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_unit()
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn pick(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "pick from an empty range");
        ((self.next_unit() * len as f64) as usize).min(len.saturating_sub(1))
    }

    /// Uniform integer in `low..=high`.
    fn range_inclusive(&mut self, low: usize, high: usize) -> usize {
        low + self.pick(high - low + 1)
    }

    /// Returns true with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_unit() < p
    }

    /// Triangular distribution on `[low, high]` peaking at `mode`.
    fn triangular(&mut self, low: f64, high: f64, mode: f64) -> f64 {
        if high <= low {
            return low;
        }
        let u = self.next_unit();
        let split = (mode - low) / (high - low);
        if u < split {
            low + ((high - low) * (mode - low) * u).sqrt()
        } else {
            high - ((high - low) * (high - mode) * (1.0 - u)).sqrt()
        }
    }
}

impl RandomSource for SmallRng {
    fn next_unit(&mut self) -> f64 {
        self.gen()
    }
}

/// Replays a fixed list of unit draws, then falls back to a constant.
///
/// Used to force decisions: a draw of `0.0` passes every `chance` test and
/// picks the first candidate; a draw close to `1.0` fails them and picks the last.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    draws: VecDeque<f64>,
    fallback: f64,
}

impl ScriptedSource {
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
            fallback: 0.5,
        }
    }

    /// A source that returns the same value forever.
    pub fn constant(value: f64) -> Self {
        Self {
            draws: VecDeque::new(),
            fallback: value,
        }
    }

    pub fn with_fallback(mut self, value: f64) -> Self {
        self.fallback = value;
        self
    }

    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl RandomSource for ScriptedSource {
    fn next_unit(&mut self) -> f64 {
        self.draws.pop_front().unwrap_or(self.fallback)
    }
}

/// Seeded random number generator resource
#[derive(Resource)]
pub struct SimRng(pub Box<dyn RandomSource>);

impl SimRng {
    pub fn new(source: impl RandomSource) -> Self {
        Self(Box::new(source))
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }

    pub fn source(&mut self) -> &mut dyn RandomSource {
        self.0.as_mut()
    }
}

/// Rounds to two decimals, as wages and productivities are sampled.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
