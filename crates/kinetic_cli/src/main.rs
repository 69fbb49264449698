use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kinetic_app::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "kinetic")]
#[command(author, version, about = "Headless runner for the Kinetic motion showcase")]
struct Cli {
    /// Config file, or a directory containing kinetic.toml
    #[arg(short = 'c', long = "config", global = true, default_value = ".")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario against the page (the built-in acceptance scenario by default)
    Run {
        /// Scenario JSON file
        scenario: Option<PathBuf>,
        /// Also write the report to this relative path
        #[arg(short = 'r', long)]
        report: Option<PathBuf>,
    },
    /// Print the page state after a number of milliseconds
    Snapshot {
        /// Logical time to advance before sampling
        #[arg(long = "at-ms", default_value_t = 0)]
        at_ms: u64,
        /// Scroll offset applied before advancing
        #[arg(long)]
        scroll: Option<f32>,
    },
    /// Validate the configuration and the built-in page
    Check,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load_or_default(&cli.config)?;

    // Initialize logging; stdout carries reports
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.log.filter.clone()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Some(Commands::Run { scenario, report }) => {
            commands::run::run(&config, scenario.as_deref(), report.as_deref())
        }
        None => commands::run::run(&config, None, None),
        Some(Commands::Snapshot { at_ms, scroll }) => {
            commands::snapshot::run(&config, at_ms, scroll)
        }
        Some(Commands::Check) => commands::check::run(&config),
    }
}
