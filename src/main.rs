// Copyright 2026 Cavity QED Sim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Cavity QED simulation runner
//!
//! Runs the reference scenarios and writes JSON reports.
//!
//! # Usage
//!
//! ```bash
//! # Semiclassical cavity cooling with default parameters
//! cavity-sim cooling
//!
//! # Smaller Fock space, report to a file
//! cavity-sim cooling --cutoff 4 --tmax 1 --steps 10 --output cooling.json
//!
//! # Damped Fock-state spectrum against its closed form
//! cavity-sim spectrum --method rectangle
//!
//! # Show effective configuration
//! cavity-sim --config config.yaml config
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cavity_qed_sim::{
    config::{Config, SolverMethod},
    correlation::SpectrumMethod,
    lindblad::Integrator,
    models::{CavityCooling, DampedFock},
    report::{write_json, CoolingReport, SpectrumReport},
    validation, Result, VERSION,
};

/// Semiclassical cavity QED simulator
#[derive(Parser)]
#[command(name = "cavity-sim")]
#[command(author = "Cavity QED Sim Contributors")]
#[command(version = VERSION)]
#[command(about = "Semiclassical Lindblad evolution and cavity emission spectra")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "CAVITYSIM_LOG_LEVEL")]
    log_level: Option<String>,

    /// ODE solver
    #[arg(long, global = true, value_enum)]
    solver: Option<SolverArg>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum SolverArg {
    Dopri5,
    Rk4,
}

#[derive(Clone, Copy, ValueEnum)]
enum MethodArg {
    Trapezoid,
    Rectangle,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the semiclassical cavity-cooling scenario
    Cooling {
        /// Fock-space cutoff
        #[arg(long)]
        cutoff: Option<usize>,

        /// Final time (units of 1/γ)
        #[arg(long)]
        tmax: Option<f64>,

        /// Number of output intervals
        #[arg(long)]
        steps: Option<usize>,

        /// Write the JSON report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compute the damped Fock-state spectrum and compare with the closed form
    Spectrum {
        /// Quadrature rule
        #[arg(long, value_enum)]
        method: Option<MethodArg>,

        /// Correlation window τmax
        #[arg(long)]
        tau_max: Option<f64>,

        /// Write the JSON report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show effective configuration
    Config,

    /// Validate configuration file
    Validate,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if let Some(solver) = cli.solver {
        config.solver.method = match solver {
            SolverArg::Dopri5 => SolverMethod::Dopri5,
            SolverArg::Rk4 => SolverMethod::Rk4,
        };
    }

    // Initialize logging
    init_logging(&config.logging.level, &config.logging.format);

    match cli.command {
        Commands::Cooling {
            cutoff,
            tmax,
            steps,
            output,
        } => {
            if let Some(cutoff) = cutoff {
                config.cooling.cutoff = cutoff;
            }
            if let Some(tmax) = tmax {
                config.cooling.tmax = tmax;
            }
            if let Some(steps) = steps {
                config.cooling.steps = steps;
            }
            config.validate()?;
            validation::validate_cooling(&config.cooling, &config.validation.limits)?;

            info!(
                version = VERSION,
                cutoff = config.cooling.cutoff,
                method = ?config.solver.method,
                "Starting cavity cooling run"
            );

            let integrator = Integrator::new(config.solver.clone())?;
            let model = CavityCooling::new(&config.cooling)?;
            let trajectory = model.run(&integrator)?;
            let report = CoolingReport::from_trajectory(&model, &trajectory)?;
            write_json(&report, output.as_deref())?;
        }

        Commands::Spectrum {
            method,
            tau_max,
            output,
        } => {
            if let Some(method) = method {
                config.spectrum.method = match method {
                    MethodArg::Trapezoid => SpectrumMethod::Trapezoid,
                    MethodArg::Rectangle => SpectrumMethod::Rectangle,
                };
            }
            if let Some(tau_max) = tau_max {
                config.damped_fock.tau_max = tau_max;
            }
            config.validate()?;
            validation::validate_damped_fock(&config.damped_fock, &config.validation.limits)?;

            info!(
                version = VERSION,
                n = config.damped_fock.n,
                tau_max = config.damped_fock.tau_max,
                method = ?config.spectrum.method,
                "Starting damped Fock spectrum run"
            );

            let integrator = Integrator::new(config.solver.clone())?;
            let model = DampedFock::new(&config.damped_fock)?;
            let grid = model.tau_grid()?;
            let comparison = model.run(&integrator, config.spectrum.method)?;
            let report = SpectrumReport {
                method: config.spectrum.method,
                tau_points: grid.len(),
                dtau: config.damped_fock.dtau,
                comparison,
            };
            write_json(&report, output.as_deref())?;
        }

        Commands::Config => {
            // Show effective configuration
            println!("{}", serde_yaml::to_string(&config)?);
        }

        Commands::Validate => {
            let result = config
                .validate()
                .and_then(|_| validation::validate_cooling(&config.cooling, &config.validation.limits))
                .and_then(|_| {
                    validation::validate_damped_fock(&config.damped_fock, &config.validation.limits)
                });
            match result {
                Ok(()) => {
                    println!("Configuration is valid");
                }
                Err(e) => {
                    error!(error = %e, "Configuration rejected");
                    eprintln!("Configuration error: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

/// Initialize logging with tracing. Logs go to stderr so reports on stdout
/// stay machine-readable.
fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if format == "json" {
        registry
            .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}
