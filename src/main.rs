mod api;
mod config;
mod logging;
mod model;
mod session;
mod tui;

use crate::api::PlannerClient;
use crate::config::Config;
use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "tripdeck", version)]
#[command(about = "Terminal front end for the AI travel planner", long_about = None)]
struct Cli {
    /// Planner API base URL (overrides the config file)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Probe planner health and exit (non-zero when unreachable)
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let (config, config_path) = Config::load_with_path().unwrap_or_else(|e| {
        eprintln!("Warning: failed to load config, using defaults: {e}");
        (Config::default(), None)
    });

    let cli = Cli::parse();
    let base_url = cli.api_url.unwrap_or_else(|| config.api.base_url.clone());

    // Lightweight subcommand — no tracing needed.
    if let Some(Command::Check) = cli.cmd {
        let client = PlannerClient::new(&base_url);
        if client.health_check().await {
            println!("planner at {} is healthy", client.base_url());
            return Ok(());
        }
        eprintln!("planner at {} is not responding", client.base_url());
        std::process::exit(1);
    }

    // Stdout logging is suppressed — ratatui owns the terminal.
    let log_dir = match logging::setup_tracing(logging::LoggingSettings {
        level: config.logging.level.as_deref(),
        directory: config.logging.directory.as_deref(),
        retention_days: config.logging.retention_days,
        suppress_stdout: true,
    }) {
        Ok(path) => Some(path),
        Err(err) => {
            eprintln!("Failed to initialize logging: {err}");
            None
        }
    };

    tracing::info!("--- Tripdeck Startup ---");
    match config_path.as_ref() {
        Some(path) => tracing::info!("Config File: {}", path.display()),
        None => tracing::info!("Config File: (default)"),
    }
    tracing::info!("Planner API: {}", base_url);
    if let Some(dir) = log_dir.as_ref() {
        tracing::info!("Log Directory: {}", dir.display());
    }

    tui::run_tui(&base_url, &config.trip).await
}
