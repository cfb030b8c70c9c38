use std::io;
use std::path::Path;

use tokio::runtime::{Builder, Runtime};

use crate::fetch::{FetchSettings, ProgressSink, ReqwestFetcher};
use crate::gallery::{self, DownloadError, DownloadSummary};
use crate::FetchError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start runtime: {0}")]
    Runtime(#[from] io::Error),
    #[error("failed to build http client: {0}")]
    Client(#[from] FetchError),
}

/// Blocking front end over the async download pipeline.
///
/// Runs on a current-thread runtime, so requests go out one at a time on the
/// caller's thread.
pub struct PuzzleEngine {
    runtime: Runtime,
    fetcher: ReqwestFetcher,
}

impl PuzzleEngine {
    pub fn new(settings: FetchSettings) -> Result<Self, EngineError> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        let fetcher = {
            let _guard = runtime.enter();
            ReqwestFetcher::new(settings)?
        };
        Ok(Self { runtime, fetcher })
    }

    pub fn download_images(
        &self,
        urls: &[String],
        dest_dir: &Path,
        sink: &dyn ProgressSink,
    ) -> Result<DownloadSummary, DownloadError> {
        self.runtime
            .block_on(gallery::download_images(&self.fetcher, urls, dest_dir, sink))
    }
}
