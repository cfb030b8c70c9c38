use std::io::Write;

use anyhow::{Context, Result};
use puzzle_engine::{read_urls, LoggingSink, PuzzleEngine};
use puzzle_logging::puzzle_info;

use crate::cli::Args;
use crate::config::{PuzzleConfig, Settings};

/// Scans the log, then prints the urls or downloads them into `--todir`.
pub fn run(args: &Args, out: &mut dyn Write) -> Result<()> {
    let config = match &args.config {
        Some(path) => PuzzleConfig::load(path)?,
        None => PuzzleConfig::default(),
    };
    let settings = Settings::resolve(config, args);

    let urls = read_urls(&args.logfile, &settings.scan)
        .with_context(|| format!("scanning {}", args.logfile.display()))?;

    let Some(dest_dir) = &args.todir else {
        return print_urls(&urls, out);
    };

    let engine = PuzzleEngine::new(settings.fetch)?;
    let summary = engine
        .download_images(&urls, dest_dir, &LoggingSink)
        .with_context(|| format!("downloading images into {}", dest_dir.display()))?;
    puzzle_info!(
        "downloaded {} images ({} bytes), index at {:?}",
        summary.image_count,
        summary.total_bytes,
        summary.index_path
    );
    Ok(())
}

fn print_urls(urls: &[String], out: &mut dyn Write) -> Result<()> {
    for url in urls {
        writeln!(out, "{url}")?;
    }
    out.flush()?;
    Ok(())
}
