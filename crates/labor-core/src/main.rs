//! Labor Market Simulation
//!
//! Runs the monthly labor market rounds from a TOML config, with CLI overrides,
//! and prints the summary report.

use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use labor_core::config::DEFAULT_CONFIG_PATH;
use labor_core::output::SummaryReport;
use labor_core::{
    load_salary_scale, write_history, Config, EnvironmentParams, EventLogger, LaborMarket, SimRng,
};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "labor_sim")]
#[command(about = "An agent-based labor market simulation")]
struct Args {
    /// Config file; defaults apply when it is missing
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Number of monthly rounds to simulate
    #[arg(long)]
    rounds: Option<u64>,

    #[arg(long)]
    firms: Option<usize>,

    #[arg(long)]
    workers: Option<usize>,

    /// Multiplies initial wage offers and reservation wages
    #[arg(long)]
    salary_scale: Option<f64>,

    /// Calibration CSV to read the salary scale from
    #[arg(long)]
    calibration: Option<PathBuf>,

    /// Write market events to this JSONL file
    #[arg(long)]
    events: Option<PathBuf>,

    /// Write the recorded histories to this JSON file
    #[arg(long)]
    history: Option<PathBuf>,

    /// Skip the summary report
    #[arg(long)]
    quiet: bool,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "labor_core=info,labor_sim=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let mut params = EnvironmentParams::from_config(&config);
    if let Some(path) = &config.environment.calibration_file {
        match load_salary_scale(path, &config.environment.calibration_column) {
            Ok(scale) => params = params.with_salary_scale(scale),
            Err(e) => {
                error!("Failed to load calibration {}: {}", path.display(), e);
                std::process::exit(1);
            }
        }
    }

    info!("Labor Market Simulation");
    info!("Seed: {}", config.simulation.seed);
    info!("Rounds: {}", config.simulation.rounds);

    let mut market = LaborMarket::create_environment(
        &params,
        config.rules(),
        SimRng::seeded(config.simulation.seed),
    )
    .with_report_interval(config.simulation.report_interval);

    if let Some(path) = &args.events {
        match EventLogger::new(path) {
            Ok(logger) => market = market.with_event_log(logger),
            Err(e) => {
                error!("Failed to open event log {}: {}", path.display(), e);
                std::process::exit(1);
            }
        }
    }

    market.run_simulation(config.simulation.rounds);

    if let Some(path) = &args.history {
        if let Err(e) = write_history(market.history(), path) {
            error!("Failed to write history {}: {}", path.display(), e);
            std::process::exit(1);
        }
        info!("Wrote history to {}", path.display());
    }

    let summary = market.summary();
    info!(
        "Unemployment mean {:.2}%, final {:.2}%; {} hires, {} layoffs, {} quits, {} switches, {} retirements",
        summary.mean_unemployment,
        summary.final_unemployment,
        summary.hires,
        summary.layoffs,
        summary.quits,
        summary.switches,
        summary.retirements
    );

    if !args.quiet {
        print!("{}", SummaryReport::from_history(market.history()));
    }
}

/// Load the config file, falling back to defaults when the default path is
/// absent, then apply CLI overrides
fn load_config(args: &Args) -> Result<Config, labor_core::ConfigError> {
    let mut config = if args.config.exists() {
        Config::load(&args.config)?
    } else if args.config.as_os_str() == DEFAULT_CONFIG_PATH {
        Config::load_or_default()
    } else {
        return Config::load(&args.config);
    };

    if let Some(seed) = args.seed {
        config.simulation.seed = seed;
    }
    if let Some(rounds) = args.rounds {
        config.simulation.rounds = rounds;
    }
    if let Some(firms) = args.firms {
        config.simulation.num_firms = firms;
    }
    if let Some(workers) = args.workers {
        config.simulation.num_workers = workers;
    }
    if let Some(scale) = args.salary_scale {
        config.environment.salary_scale = scale;
    }
    if let Some(path) = &args.calibration {
        config.environment.calibration_file = Some(path.clone());
    }

    config.validate()?;
    Ok(config)
}
