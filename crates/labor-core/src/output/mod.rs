//! Output Generation
//!
//! The run history resource, run statistics, and the console summary report.

pub mod report;
pub mod stats;

use bevy_ecs::prelude::*;
use labor_events::SimulationHistory;
use std::fs;
use std::ops::{Deref, DerefMut};
use std::path::Path;

pub use report::{report_rounds, FirmLine, RoundReport, SummaryReport};
pub use stats::{RunStats, RunSummary};

/// Resource: the histories recorded by the phases
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct MarketHistory(pub SimulationHistory);

impl Deref for MarketHistory {
    type Target = SimulationHistory;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for MarketHistory {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// Write the history as pretty JSON, creating parent directories as needed
pub fn write_history(history: &SimulationHistory, path: impl AsRef<Path>) -> std::io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let json = history
        .to_json()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    fs::write(path, json)?;
    Ok(())
}
