//! Tracing setup and configuration summary.

use eyre::{Result, eyre};
use siga_config::SigaConfig;
use tracing_subscriber::EnvFilter;

use crate::cli::LogFormat;

/// Install the global subscriber.
///
/// `level` is an `EnvFilter` directive such as `info` or
/// `siga_transport=debug,info`. `RUST_LOG`, when set, takes precedence.
pub fn init_tracing(level: &str, format: LogFormat) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| eyre!("invalid log level {level:?}: {e}"))?,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    let installed = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };
    installed.map_err(|e| eyre!("failed to install tracing subscriber: {e}"))
}

/// Log the effective configuration at startup.
pub fn log_config_summary(config: &SigaConfig) {
    info!(
        endpoint = %config.endpoint.url,
        timeout_ms = config.endpoint.timeout_ms,
        "endpoint"
    );
    info!(enabled = config.cache.enabled, ttl_ms = config.cache.ttl_ms, "response cache");
    debug!(
        min_chars = config.search.min_chars,
        debounce_ms = config.search.debounce_ms,
        max_attachment_bytes = config.attachments.max_size_bytes,
        allowed_extensions = ?config.attachments.allowed_extensions,
        "search and attachment limits"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_directive_is_rejected() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        assert!(init_tracing("siga=verbose", LogFormat::Text).is_err());
    }
}
