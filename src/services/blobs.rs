//! Blob-storage shim: persists an uploaded image and hands back a URL.

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use thiserror::Error;

const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

// 5 MB cap on decoded payloads.
const MAX_BLOB_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("unsupported file type")]
    UnsupportedType,
    #[error("file too large")]
    TooLarge,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Content-addressed file storage under a configured directory. The
/// returned URL is `base_url` + the stored name; re-uploading identical
/// bytes yields the same URL.
#[derive(Clone)]
pub struct BlobStore {
    dir: PathBuf,
    base_url: String,
}

impl BlobStore {
    pub fn new(dir: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            base_url: base_url.into(),
        }
    }

    pub async fn store(&self, filename: &str, bytes: &[u8]) -> Result<String, UploadError> {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .ok_or(UploadError::UnsupportedType)?;
        if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(UploadError::UnsupportedType);
        }
        if bytes.len() > MAX_BLOB_BYTES {
            return Err(UploadError::TooLarge);
        }

        let digest = Sha256::digest(bytes);
        let name = format!("{digest:x}.{ext}");

        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.dir.join(&name), bytes).await?;

        Ok(format!("{}/{}", self.base_url.trim_end_matches('/'), name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stores_bytes_and_returns_stable_url() {
        let dir = std::env::temp_dir().join("event_booking_blob_test");
        let store = BlobStore::new(&dir, "http://localhost:8000/uploads/");

        let url = store.store("avatar.png", b"fake image bytes").await.unwrap();
        let again = store.store("other.png", b"fake image bytes").await.unwrap();

        assert!(url.starts_with("http://localhost:8000/uploads/"));
        assert!(url.ends_with(".png"));
        // Same content, same address.
        assert_eq!(url, again);
    }

    #[tokio::test]
    async fn rejects_unknown_extension() {
        let dir = std::env::temp_dir().join("event_booking_blob_test");
        let store = BlobStore::new(&dir, "http://localhost:8000/uploads");

        let err = store.store("payload.exe", b"nope").await.unwrap_err();
        assert!(matches!(err, UploadError::UnsupportedType));
    }
}
