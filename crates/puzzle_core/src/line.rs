use std::sync::LazyLock;

use regex::Regex;

pub const DEFAULT_HOST: &str = "http://code.google.com";
pub const DEFAULT_MARKER: &str = "puzzle";

static GET_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""GET (\S+)"#).expect("valid GET path regex"));

/// What the scanner keeps and how it turns a request path into a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSettings {
    /// Prefix joined verbatim in front of every accepted path.
    pub host: String,
    /// Substring a path must contain to be kept.
    pub marker: String,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            marker: DEFAULT_MARKER.to_string(),
        }
    }
}

/// Returns the request path of the first `"GET <path>` token on the line.
pub fn extract_get_path(line: &str) -> Option<&str> {
    GET_PATH
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Full URL for a log line whose GET path contains the marker.
pub fn puzzle_url(line: &str, settings: &ScanSettings) -> Option<String> {
    let path = extract_get_path(line)?;
    if !path.contains(settings.marker.as_str()) {
        return None;
    }
    Some(format!("{}{}", settings.host, path))
}
