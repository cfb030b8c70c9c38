use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use puzzle_engine::{FetchSettings, ScanSettings};
use serde::Deserialize;

use crate::cli::Args;

/// Optional settings file, e.g.
///
/// ```ron
/// (
///     host: Some("http://localhost:8000"),
///     request_timeout_secs: Some(5),
///     allowed_content_types: Some(["image/*"]),
/// )
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PuzzleConfig {
    pub host: Option<String>,
    pub marker: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub redirect_limit: Option<usize>,
    pub max_bytes: Option<u64>,
    pub allowed_content_types: Option<Vec<String>>,
}

impl PuzzleConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        ron::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub scan: ScanSettings,
    pub fetch: FetchSettings,
}

impl Settings {
    /// Command line flags win over the config file, which wins over defaults.
    pub fn resolve(config: PuzzleConfig, args: &Args) -> Self {
        let defaults = ScanSettings::default();
        let scan = ScanSettings {
            host: args.host.clone().or(config.host).unwrap_or(defaults.host),
            marker: config.marker.unwrap_or(defaults.marker),
        };

        let mut fetch = FetchSettings::default();
        if let Some(secs) = config.connect_timeout_secs {
            fetch.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = args.timeout.or(config.request_timeout_secs) {
            fetch.request_timeout = Duration::from_secs(secs);
        }
        if let Some(limit) = config.redirect_limit {
            fetch.redirect_limit = limit;
        }
        if let Some(max_bytes) = config.max_bytes {
            fetch.max_bytes = max_bytes;
        }
        if let Some(types) = config.allowed_content_types {
            fetch.allowed_content_types = types;
        }

        Self { scan, fetch }
    }
}
