//! `siga` - help-desk tickets for SIGA executing units.
//!
//! This binary parses the command line, loads configuration and runs one
//! command against the Apps Script endpoint.

#[macro_use]
extern crate tracing;

use std::process::ExitCode;

use siga_cli::{
    Cli, init_tracing, log_config_summary,
    clap::Parser,
    eyre::{Context, Result},
};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.log_format)?;

    info!(config_path = %cli.config.display(), "loading configuration");
    let config = cli
        .load_config()
        .wrap_err_with(|| format!("failed to load config from {}", cli.config.display()))?;
    log_config_summary(&config);

    let report = siga_cli::run(&cli, &config).await?;
    println!("{}", report.text);

    Ok(if report.success { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
