//! Command-line interface definitions for `siga`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use eyre::Result;
use siga_config::SigaConfig;

/// Output format of log lines.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Command-line interface for the SIGA help-desk client.
#[derive(Parser, Debug, Clone)]
#[command(name = "siga")]
#[command(about = "Help-desk tickets for SIGA executing units")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "SIGA_CONFIG", default_value = "siga.toml")]
    pub config: PathBuf,

    /// Endpoint URL, overrides `endpoint.url`
    #[arg(long, env = "SIGA_ENDPOINT_URL")]
    pub endpoint: Option<String>,

    /// Request timeout in milliseconds, overrides `endpoint.timeout_ms`
    #[arg(long, env = "SIGA_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Log level or filter directive (trace, debug, info, warn, error)
    #[arg(short, long, env = "SIGA_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log format
    #[arg(long, env = "SIGA_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Check that the endpoint answers
    Ping,
    /// Search executing units by code or name
    Search {
        /// At least two characters of a code or name
        term: String,
    },
    /// Show one executing unit
    Lookup {
        /// Executing unit code
        codigo: String,
    },
    /// Validate and submit a ticket, then upload its attachments
    Submit {
        /// TOML file with the ticket form
        #[arg(long)]
        ticket: PathBuf,
        /// File to attach; repeat for several files
        #[arg(long = "attach")]
        attachments: Vec<PathBuf>,
    },
    /// Validate the configuration and exit
    Check,
}

impl Cli {
    /// Load the configuration file, apply flag and environment overrides and
    /// validate the result.
    pub fn load_config(&self) -> Result<SigaConfig> {
        let mut config = SigaConfig::load_or_default(&self.config)?;
        if let Some(url) = &self.endpoint {
            config.endpoint.url = url.clone();
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.endpoint.timeout_ms = timeout_ms;
        }
        config.validate()?;
        Ok(config)
    }
}
