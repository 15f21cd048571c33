//! Correct the WC17 datasets and build the summary and correlation tables.
//!
//! Reads `wc17.toml` from the working directory if it exists, otherwise runs the built-in
//! configuration. Log verbosity follows `RUST_LOG`, defaulting to `info`.
use std::{path::Path, process};
use tracing::info;
use tracing_subscriber::EnvFilter;

use trace_metal_analysis::{config::PipelineConfig, pipeline::run_pipeline, AnalysisError, Result};

const CONFIG_FILE: &str = "wc17.toml";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);

        let exit_code = match e {
            AnalysisError::Config(_) => 2,
            AnalysisError::Io(_) => 3,
            AnalysisError::MissingFile(_) => 4,
            _ => 1,
        };
        process::exit(exit_code);
    }
}

fn run() -> Result<()> {
    let config = if Path::new(CONFIG_FILE).exists() {
        info!(path = CONFIG_FILE, "using pipeline configuration file");
        PipelineConfig::load(CONFIG_FILE)?
    } else {
        info!("using built-in pipeline configuration");
        PipelineConfig::default()
    };

    run_pipeline(&config)
}
