//! Configuration System
//!
//! Loads run parameters and market rule constants from `labor.toml` so they can
//! be tuned without recompiling. Every section has defaults; a partial file only
//! overrides the keys it names.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default config file path
pub const DEFAULT_CONFIG_PATH: &str = "labor.toml";

/// Default calibration column holding the salary scale
pub const DEFAULT_CALIBRATION_COLUMN: &str = "Salary Scale";

/// Top-level configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub simulation: SimulationConfig,
    pub environment: EnvironmentConfig,
    pub worker: WorkerRules,
    pub firm: FirmRules,
    pub hiring: HiringRules,
}

/// Run parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of monthly rounds to run
    pub rounds: u64,
    pub seed: u64,
    pub num_firms: usize,
    pub num_workers: usize,
    /// Rounds between progress log lines
    pub report_interval: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rounds: 1200,
            seed: 42,
            num_firms: 30,
            num_workers: 6000,
            report_interval: 120,
        }
    }
}

/// Initial population bounds and calibration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub min_wage: f64,
    pub max_wage: f64,
    pub min_experience: f64,
    pub max_experience: f64,
    /// Multiplies firm wage offers and worker reservation wages
    pub salary_scale: f64,
    /// CSV file to read the salary scale from; overrides `salary_scale`
    pub calibration_file: Option<PathBuf>,
    pub calibration_column: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            min_wage: 70.0,
            max_wage: 130.0,
            min_experience: 0.0,
            max_experience: 30.0,
            salary_scale: 1.0,
            calibration_file: None,
            calibration_column: DEFAULT_CALIBRATION_COLUMN.to_string(),
        }
    }
}

/// Per-round worker behavior constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerRules {
    /// Reservation wage multiplier while unemployed
    pub unemployed_wage_decay: f64,
    /// Reservation wage multiplier while employed
    pub employed_wage_growth: f64,
    /// Loyalty gained (employed) or lost (unemployed) per round
    pub loyalty_step: f64,
    /// Scales disloyalty into a per-round switch probability
    pub switch_propensity: f64,
    /// Productivity multiplier per month of experience
    pub monthly_productivity_growth: f64,
    pub retirement_years: f64,
}

impl Default for WorkerRules {
    fn default() -> Self {
        Self {
            unemployed_wage_decay: 0.95,
            employed_wage_growth: 1.005,
            loyalty_step: 0.01,
            switch_propensity: 0.1,
            monthly_productivity_growth: 1.002,
            retirement_years: 40.0,
        }
    }
}

/// Firm behavior constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirmRules {
    /// Wage offer multiplier after a rejected offer
    pub offer_raise: f64,
    /// Fraction of peak profit below which layoffs start
    pub layoff_threshold: f64,
    /// One in `layoff_divisor` employees is laid off (at least one)
    pub layoff_divisor: usize,
}

impl Default for FirmRules {
    fn default() -> Self {
        Self {
            offer_raise: 1.05,
            layoff_threshold: 0.25,
            layoff_divisor: 4,
        }
    }
}

/// Opening counts per firm per round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HiringRules {
    /// Unemployment fraction below which the market counts as tight
    pub tight_market_rate: f64,
    pub tight_min_openings: usize,
    pub tight_max_openings: usize,
    pub min_openings: usize,
    pub max_openings: usize,
}

impl Default for HiringRules {
    fn default() -> Self {
        Self {
            tight_market_rate: 0.04,
            tight_min_openings: 0,
            tight_max_openings: 1,
            min_openings: 1,
            max_openings: 5,
        }
    }
}

/// Resource: the rule constants every phase reads
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct MarketRules {
    pub worker: WorkerRules,
    pub firm: FirmRules,
    pub hiring: HiringRules,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default path, or use defaults if not found
    pub fn load_or_default() -> Self {
        Self::load(DEFAULT_CONFIG_PATH).unwrap_or_else(|e| {
            tracing::warn!("Could not load {}: {}. Using defaults.", DEFAULT_CONFIG_PATH, e);
            Self::default()
        })
    }

    /// The rule constants as a resource
    pub fn rules(&self) -> MarketRules {
        MarketRules {
            worker: self.worker.clone(),
            firm: self.firm.clone(),
            hiring: self.hiring.clone(),
        }
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let env = &self.environment;
        if !(env.salary_scale.is_finite() && env.salary_scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "salary_scale must be a positive number, got {}",
                env.salary_scale
            )));
        }
        if env.min_wage > env.max_wage {
            return Err(ConfigError::Invalid(format!(
                "min_wage {} exceeds max_wage {}",
                env.min_wage, env.max_wage
            )));
        }
        if env.min_experience < 0.0 || env.min_experience > env.max_experience {
            return Err(ConfigError::Invalid(format!(
                "experience bounds [{}, {}] are not a valid range",
                env.min_experience, env.max_experience
            )));
        }
        if self.simulation.num_workers == 0 {
            return Err(ConfigError::Invalid("num_workers must be at least 1".to_string()));
        }
        if self.hiring.tight_min_openings > self.hiring.tight_max_openings
            || self.hiring.min_openings > self.hiring.max_openings
        {
            return Err(ConfigError::Invalid("opening ranges must have min <= max".to_string()));
        }
        if !(self.firm.offer_raise.is_finite() && self.firm.offer_raise >= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "offer_raise must be at least 1.0, got {}",
                self.firm.offer_raise
            )));
        }
        if self.firm.layoff_divisor == 0 {
            return Err(ConfigError::Invalid("layoff_divisor must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.worker.loyalty_step) {
            return Err(ConfigError::Invalid(format!(
                "loyalty_step must lie in [0, 1], got {}",
                self.worker.loyalty_step
            )));
        }
        Ok(())
    }
}

/// Configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
