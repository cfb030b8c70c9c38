//! Logpuzzle engine: log scanning, image download and index persistence.
mod engine;
mod fetch;
mod gallery;
mod persist;
mod scan;
mod types;

pub use engine::{EngineError, PuzzleEngine};
pub use fetch::{FetchSettings, Fetcher, LoggingSink, ProgressSink, ReqwestFetcher};
pub use gallery::{download_images, DownloadError, DownloadSummary};
pub use persist::{create_destination_dir, AtomicFileWriter, PersistError};
pub use scan::{read_urls, ScanError};
pub use types::{DownloadEvent, FailureKind, FetchError, FetchMetadata, FetchOutput, ImageIndex};

pub use puzzle_core::ScanSettings;
