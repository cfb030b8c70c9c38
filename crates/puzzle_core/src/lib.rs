//! Logpuzzle core: pure log-line matching, URL ordering and index rendering.
mod index;
mod line;
mod order;

pub use index::{image_filename, image_tag, render_index, INDEX_FILENAME};
pub use line::{extract_get_path, puzzle_url, ScanSettings, DEFAULT_HOST, DEFAULT_MARKER};
pub use order::{order_urls, sort_key};
