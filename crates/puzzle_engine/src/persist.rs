use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("destination already exists: {0}")]
    DirectoryExists(PathBuf),
    #[error("cannot create destination {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Creates a fresh destination directory; an existing path of any kind is an error.
pub fn create_destination_dir(dir: &Path) -> Result<(), PersistError> {
    if fs::symlink_metadata(dir).is_ok() {
        return Err(PersistError::DirectoryExists(dir.to_path_buf()));
    }
    let create_dir = |source: io::Error| PersistError::CreateDir {
        path: dir.to_path_buf(),
        source,
    };
    if let Some(parent) = dir.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(create_dir)?;
    }
    // Another process may win the race between the existence check and the mkdir.
    fs::create_dir(dir).map_err(|err| {
        if err.kind() == io::ErrorKind::AlreadyExists {
            PersistError::DirectoryExists(dir.to_path_buf())
        } else {
            create_dir(err)
        }
    })
}

/// Atomically writes `{dir}/{filename}` by filling a temp file in `dir`, then renaming it.
///
/// The temp file lives in the target directory so the rename never crosses a
/// filesystem, and it is removed on drop if any step fails. Existing files are
/// never replaced.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn write(&self, filename: &str, content: &[u8]) -> Result<PathBuf, PersistError> {
        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content)?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        tmp.persist_noclobber(&target)
            .map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}
