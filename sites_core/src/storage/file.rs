use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use super::Storage;
use crate::error::StorageError;

/// Keeps every record in its own `<key>.json` file inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Opens the storage rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(FileStorage { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(key)))
    }
}

/// The file name, without extension, that `key` is stored under. Distinct
/// keys can share a stem, e.g. `a.b` and `a_b`.
pub(crate) fn file_stem(key: &str) -> String {
    // keys never escape the directory
    key.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

fn io_error(key: &str, source: io::Error) -> StorageError {
    StorageError::Io { key: key.to_string(), source }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(document) => Ok(Some(document)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_error(key, err)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let staging = path.with_extension("json.tmp");
        // write aside and rename over the target so readers never see half a
        // document
        fs::write(&staging, value).map_err(|err| io_error(key, err))?;
        if let Err(err) = fs::rename(&staging, &path) {
            if let Err(cleanup) = fs::remove_file(&staging) {
                tracing::warn!(key, error = %cleanup, "could not remove staged write");
            }
            return Err(io_error(key, err));
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(io_error(key, err)),
        }
    }
}
