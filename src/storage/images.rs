//! Uploaded image files on disk

use crate::core::{ImageUpload, RegistryError, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

const MAX_EXTENSION_LEN: usize = 8;

/// Directory of uploaded images, addressed by generated file names.
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_of(&self, file_ref: &str) -> Option<PathBuf> {
        is_plain_file_name(file_ref).then(|| self.dir.join(file_ref))
    }

    /// Write one upload and return the file name it was stored under.
    pub async fn store(&self, upload: &ImageUpload) -> Result<String> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            RegistryError::persistence(format!("Failed to create uploads directory: {}", e))
        })?;

        let file_ref = generate_file_ref(upload);
        tokio::fs::write(self.dir.join(&file_ref), &upload.bytes)
            .await
            .map_err(|e| RegistryError::persistence(format!("Failed to store image: {}", e)))?;

        debug!(file_ref = %file_ref, bytes = upload.bytes.len(), "image stored");
        Ok(file_ref)
    }

    /// Best-effort delete. Returns whether a file was actually removed.
    pub async fn remove(&self, file_ref: &str) -> bool {
        let Some(path) = self.path_of(file_ref) else {
            warn!(file_ref = %file_ref, "refusing to remove image outside uploads directory");
            return false;
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(file_ref = %file_ref, "image removed");
                true
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => false,
            Err(err) => {
                warn!(file_ref = %file_ref, error = %err, "failed to remove image");
                false
            }
        }
    }
}

pub fn is_image_content_type(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| ct.trim().to_ascii_lowercase().starts_with("image/"))
        .unwrap_or(false)
}

fn is_plain_file_name(file_ref: &str) -> bool {
    !file_ref.is_empty()
        && file_ref != "."
        && file_ref != ".."
        && !file_ref.contains(['/', '\\'])
        && !file_ref.contains("..")
}

fn generate_file_ref(upload: &ImageUpload) -> String {
    let extension = upload
        .file_name
        .as_deref()
        .and_then(extension_from_name)
        .or_else(|| {
            upload
                .content_type
                .as_deref()
                .and_then(extension_from_content_type)
                .map(str::to_string)
        });

    let stem = format!("{}-{}", Utc::now().timestamp_millis(), Uuid::new_v4().simple());
    match extension {
        Some(ext) => format!("{stem}.{ext}"),
        None => stem,
    }
}

fn extension_from_name(name: &str) -> Option<String> {
    let ext = Path::new(name).extension()?.to_str()?;
    (!ext.is_empty()
        && ext.len() <= MAX_EXTENSION_LEN
        && ext.chars().all(|c| c.is_ascii_alphanumeric()))
    .then(|| ext.to_ascii_lowercase())
}

fn extension_from_content_type(content_type: &str) -> Option<&'static str> {
    let essence = content_type.split(';').next()?.trim().to_ascii_lowercase();
    match essence.as_str() {
        "image/png" => Some("png"),
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/svg+xml" => Some("svg"),
        "image/bmp" => Some("bmp"),
        _ => None,
    }
}
