//! Market Setup
//!
//! Calibration loading, population sampling, and initial environment creation.

pub mod calibration;
pub mod environment;
pub mod population;

pub use calibration::{load_salary_scale, parse_salary_scale, CalibrationError};
pub use environment::{create_environment, EnvironmentParams, EnvironmentSummary};
pub use population::{sample_worker, ReplacementProfile, WorkerIdAllocator};
