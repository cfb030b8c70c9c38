use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

use crate::logging::LogDestination;

/// Find the puzzle image urls in an apache access log and optionally
/// download them into a new directory with an index.html.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "logpuzzle", version)]
pub struct Args {
    /// Destination directory for downloaded images; must not exist yet
    #[arg(short = 'd', long, value_name = "DIR")]
    pub todir: Option<PathBuf>,

    /// RON file with scan and fetch settings
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Host prefix joined to every puzzle path
    #[arg(long, value_name = "URL")]
    pub host: Option<String>,

    /// Per-image request timeout
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Log debug detail to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Also write the log to this file
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Apache logfile to extract urls from
    pub logfile: PathBuf,
}

impl Args {
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    pub fn log_destination(&self) -> LogDestination {
        match &self.log_file {
            Some(path) => LogDestination::Both(path.clone()),
            None => LogDestination::Terminal,
        }
    }
}
