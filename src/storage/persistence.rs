//! JSON file persistence for the record collection

use super::engine::{RecordStore, StoreDocument};
use async_trait::async_trait;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, error, warn};

/// Keeps the whole collection in one pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_atomically(path: &Path, document: &StoreDocument) -> std::io::Result<()> {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent)?;

        let temp = NamedTempFile::new_in(&parent)?;
        {
            let mut writer = BufWriter::new(temp.as_file());
            serde_json::to_writer_pretty(&mut writer, document)?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn load(&self) -> StoreDocument {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "data file missing, starting empty");
                return StoreDocument::default();
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "failed to read data file");
                return StoreDocument::default();
            }
        };

        match serde_json::from_slice::<StoreDocument>(&bytes) {
            Ok(document) => document,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "data file is not a valid store document");
                StoreDocument::default()
            }
        }
    }

    async fn save(&self, document: &StoreDocument) {
        let path = self.path.clone();
        let document = document.clone();
        let result =
            tokio::task::spawn_blocking(move || Self::write_atomically(&path, &document)).await;

        match result {
            Ok(Ok(())) => debug!(path = %self.path.display(), "data file written"),
            Ok(Err(err)) => {
                error!(path = %self.path.display(), error = %err, "failed to write data file")
            }
            Err(err) => error!(error = %err, "data file writer task failed"),
        }
    }
}
