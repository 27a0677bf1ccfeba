//! Labor Market Simulation Engine Library
//!
//! Workers and firms as ECS entities, driven through a fixed monthly round of
//! hiring, profit and layoffs, wage drift, job switching, and retirement.

pub mod components;
pub mod config;
pub mod events;
pub mod invariants;
pub mod market;
pub mod output;
pub mod pipeline;
pub mod rng;
pub mod setup;
pub mod systems;

pub use components::*;

pub use config::{Config, ConfigError, MarketRules};
pub use events::{EventLogger, RoundEvents};
pub use invariants::{check_population, InvariantViolation};
pub use market::LaborMarket;
pub use output::{write_history, MarketHistory, RunStats, RunSummary, SummaryReport};
pub use pipeline::{Phase, RoundPipeline, PHASE_ORDER};
pub use rng::{RandomSource, ScriptedSource, SimRng};
pub use setup::{
    load_salary_scale, CalibrationError, EnvironmentParams, ReplacementProfile, WorkerIdAllocator,
};
pub use systems::{unemployment_rate, RoundClock};
