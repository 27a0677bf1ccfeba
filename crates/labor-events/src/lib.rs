//! Shared event and history types for the labor market simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! The engine writes them; reporting and plotting tools read them.

pub mod event;
pub mod snapshot;
pub mod timestamp;

pub use timestamp::{MarketDate, ParseDateError, RoundStamp, MONTHS_PER_YEAR};

pub use event::{generate_event_id, EventKind, MarketEvent};

pub use snapshot::{
    generate_run_id, FirmRoundStats, FirmStatsSnapshot, ProfitHistory, SimulationHistory,
};
