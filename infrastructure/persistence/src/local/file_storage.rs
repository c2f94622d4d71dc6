use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;

use business::domain::errors::StorageError;
use business::domain::sync::storage::LocalStorage;

/// Stores each key as `<dir>/<key>.json`.
///
/// Saves go through a temporary file and a rename, so a crash mid-write
/// leaves the previous blob intact.
pub struct FileLocalStorage {
    dir: PathBuf,
}

impl FileLocalStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

#[async_trait]
impl LocalStorage for FileLocalStorage {
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        match tokio::fs::read(self.path_for(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => {
                tracing::error!(error = %e, key, "Failed to read local storage");
                Err(StorageError::Io)
            }
        }
    }

    async fn save(&self, key: &str, bytes: Vec<u8>) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|_| StorageError::Io)?;

        let target = self.path_for(key);
        let staging = self.dir.join(format!("{}.json.tmp", key));
        tokio::fs::write(&staging, bytes)
            .await
            .map_err(|_| StorageError::Io)?;
        tokio::fs::rename(&staging, &target)
            .await
            .map_err(|_| StorageError::Io)
    }
}
