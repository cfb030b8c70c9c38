use std::path::{Path, PathBuf};

use puzzle_core::{image_filename, render_index, INDEX_FILENAME};
use puzzle_logging::{puzzle_debug, puzzle_warn};

use crate::fetch::{Fetcher, ProgressSink};
use crate::persist::{create_destination_dir, AtomicFileWriter, PersistError};
use crate::{DownloadEvent, FetchError, ImageIndex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSummary {
    pub image_count: usize,
    pub total_bytes: u64,
    pub index_path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error("image {index} ({url}) failed: {source}")]
    Fetch {
        index: ImageIndex,
        url: String,
        #[source]
        source: FetchError,
    },
}

/// Downloads every URL, in order, into a new `dest_dir` as `img0`, `img1`, ...
/// and writes an `index.html` showing them.
///
/// Stops at the first failure. Images stored before the failure stay on disk
/// and no index is written.
pub async fn download_images(
    fetcher: &dyn Fetcher,
    urls: &[String],
    dest_dir: &Path,
    sink: &dyn ProgressSink,
) -> Result<DownloadSummary, DownloadError> {
    create_destination_dir(dest_dir)?;
    puzzle_debug!("created {:?} for {} images", dest_dir, urls.len());

    let writer = AtomicFileWriter::new(dest_dir.to_path_buf());
    let mut names = Vec::with_capacity(urls.len());
    let mut total_bytes = 0u64;

    for (index, url) in urls.iter().enumerate() {
        sink.emit(DownloadEvent::Retrieving {
            index,
            url: url.clone(),
        });
        let output = match fetcher.fetch(index, url, sink).await {
            Ok(output) => output,
            Err(source) => {
                puzzle_warn!(
                    "aborting after {} of {} images: {}",
                    index,
                    urls.len(),
                    source
                );
                return Err(DownloadError::Fetch {
                    index,
                    url: url.clone(),
                    source,
                });
            }
        };

        let name = image_filename(index);
        let path = writer.write(&name, &output.bytes)?;
        total_bytes += output.metadata.byte_len;
        sink.emit(DownloadEvent::Stored { index, path });
        names.push(name);
    }

    let index_path = writer.write(INDEX_FILENAME, render_index(&names).as_bytes())?;
    sink.emit(DownloadEvent::IndexWritten {
        path: index_path.clone(),
    });

    Ok(DownloadSummary {
        image_count: names.len(),
        total_bytes,
        index_path,
    })
}
