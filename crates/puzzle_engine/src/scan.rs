use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use puzzle_core::{order_urls, puzzle_url, ScanSettings};
use puzzle_logging::{puzzle_debug, puzzle_info, puzzle_trace};

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("cannot read log file {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Reads an access log and returns its unique puzzle URLs in sort-key order.
///
/// Lines are split on `\n`, stripped of a trailing `\r` and decoded lossily;
/// a stray non-UTF-8 byte in a user agent does not hide the GET path on the
/// same line.
pub fn read_urls(path: impl AsRef<Path>, settings: &ScanSettings) -> Result<Vec<String>, ScanError> {
    let path = path.as_ref();
    let file_access = |source: io::Error| ScanError::FileAccess {
        path: path.to_path_buf(),
        source,
    };

    let reader = BufReader::new(File::open(path).map_err(file_access)?);
    let mut matched = Vec::new();
    let mut line_count = 0usize;
    for raw in reader.split(b'\n') {
        let raw = raw.map_err(file_access)?;
        line_count += 1;
        let raw = raw.strip_suffix(b"\r").unwrap_or(&raw[..]);
        let line = String::from_utf8_lossy(raw);
        if let Some(url) = puzzle_url(&line, settings) {
            puzzle_trace!("line {} -> {}", line_count, url);
            matched.push(url);
        }
    }

    puzzle_debug!(
        "scanned {} lines of {:?}, {} matched marker {:?}",
        line_count,
        path,
        matched.len(),
        settings.marker
    );
    let ordered = order_urls(matched);
    puzzle_info!("found {} unique puzzle urls in {:?}", ordered.len(), path);
    Ok(ordered)
}
