mod analyzer;
mod config;
mod error;
mod explorer;
mod export;
mod models;
mod parser;

use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::export::WriteOutcome;

#[tokio::main]
async fn main() -> ExitCode {
    // Diagnostics go to stderr; stdout carries only the result line
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)                     // cleaner logs (no module names unless needed)
        .init();

    info!("BTC newest-block analyzer starting...");

    let cfg = match config::load() {
        Ok(cfg) => cfg,
        Err(err) => {
            println!("Error: {}", err);
            return ExitCode::from(err.exit_code());
        }
    };
    info!("  API URL: {}", cfg.api_base_url);
    info!("  Output dir: {}", cfg.output_dir.display());
    info!("  Request timeout: {}s", cfg.request_timeout_secs);

    match analyzer::run(&cfg).await {
        Ok(WriteOutcome::Written) => {
            println!("Operation succesfully completed");
            ExitCode::SUCCESS
        }
        Ok(WriteOutcome::AlreadyAnalyzed) => {
            println!("Block already analyzed");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("Pipeline failed: {}", err);
            println!("Error: {}", err);
            ExitCode::from(err.exit_code())
        }
    }
}
