#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

use std::{path::Path, time::Duration};

use eyre::{Context, Result, bail, ensure};
use serde::{Deserialize, Serialize};

/// Production Apps Script deployment.
pub const DEFAULT_ENDPOINT_URL: &str = "https://script.google.com/macros/s/AKfycbyuqmaQgpdyxwUXTveTrOailRcZb8y27beTU5Rz_3CsCZlT0y7rOLDAV4sEAeGmCO03/exec";
/// Request budget before a call is considered timed out.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
/// Time-to-live of memoized lookups.
pub const DEFAULT_CACHE_TTL_MS: u64 = 5 * 60 * 1000;
/// Shortest search term that reaches the network.
pub const DEFAULT_MIN_SEARCH_CHARS: usize = 2;
/// Quiet period before a typed search is issued.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
/// Largest attachment accepted locally.
pub const DEFAULT_MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024;
/// Attachment extensions accepted locally.
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] =
    &["pdf", "png", "jpg", "jpeg", "gif", "doc", "docx", "xls", "xlsx", "txt"];

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SigaConfig {
    pub endpoint: EndpointConfig,
    pub cache: CacheConfig,
    pub search: SearchConfig,
    pub attachments: AttachmentConfig,
}

/// Remote endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EndpointConfig {
    pub url: String,
    pub timeout_ms: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self { url: DEFAULT_ENDPOINT_URL.to_string(), timeout_ms: DEFAULT_TIMEOUT_MS }
    }
}

impl EndpointConfig {
    /// Request timeout as a [`Duration`].
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Response cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    pub enabled: bool,
    pub ttl_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { enabled: true, ttl_ms: DEFAULT_CACHE_TTL_MS }
    }
}

impl CacheConfig {
    /// Entry time-to-live as a [`Duration`].
    pub const fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

/// Autocomplete settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    pub min_chars: usize,
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { min_chars: DEFAULT_MIN_SEARCH_CHARS, debounce_ms: DEFAULT_DEBOUNCE_MS }
    }
}

impl SearchConfig {
    /// Debounce quiet period as a [`Duration`].
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Local attachment limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AttachmentConfig {
    pub max_size_bytes: u64,
    pub allowed_extensions: Vec<String>,
}

impl Default for AttachmentConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: DEFAULT_MAX_ATTACHMENT_BYTES,
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl AttachmentConfig {
    /// Whether `extension` (without the dot, any case) is accepted.
    pub fn allows(&self, extension: &str) -> bool {
        self.allowed_extensions.iter().any(|e| e.eq_ignore_ascii_case(extension))
    }
}

impl SigaConfig {
    /// Parse and validate a TOML document.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).wrap_err("failed to parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config file: {}", path.display()))?;
        Self::parse(&contents).wrap_err_with(|| format!("invalid config: {}", path.display()))
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.endpoint.url)
            .wrap_err_with(|| format!("invalid endpoint url: {}", self.endpoint.url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("endpoint url must use http or https, got {}", url.scheme());
        }
        ensure!(self.endpoint.timeout_ms > 0, "endpoint.timeout_ms must be greater than 0");
        ensure!(self.cache.ttl_ms > 0, "cache.ttl_ms must be greater than 0");
        ensure!(self.search.min_chars >= 1, "search.min_chars must be at least 1");
        ensure!(
            self.attachments.max_size_bytes > 0,
            "attachments.max_size_bytes must be greater than 0"
        );
        Ok(())
    }
}
