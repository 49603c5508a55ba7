//! Disk-backed image storage.
//!
//! Images live under `<root>/<bucket>/<folder>/<millis>.<ext>` and are
//! published at `<base>/storage/<bucket>/<folder>/<file>` by the
//! server's static file route. Records store the public URL, so
//! cleanup paths parse the bucket-relative path back out of it.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Utc;
use tracing::{info, warn};

/// Handle to the on-disk image store.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
    public_base: String,
}

/// A stored image: its bucket-relative path and public URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub path: String,
    pub public_url: String,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        let mut public_base = public_base.into();
        while public_base.ends_with('/') {
            public_base.pop();
        }
        Self {
            root: root.into(),
            public_base,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store `bytes` under `<bucket>/<folder>/`, named by upload time
    /// with the original extension.
    pub async fn upload(
        &self,
        bucket: &str,
        folder: &str,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<StoredImage> {
        if bytes.is_empty() {
            bail!("no file content provided");
        }

        let ext = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("bin");
        let rel = format!("{}/{}.{}", folder, Utc::now().timestamp_millis(), ext);

        let dir = self.root.join(bucket).join(folder);
        tokio::fs::create_dir_all(&dir)
            .await
            .context("Failed to create storage directory")?;
        tokio::fs::write(self.root.join(bucket).join(&rel), bytes)
            .await
            .context("Failed to write image file")?;

        info!(bucket, path = %rel, size = bytes.len(), "stored image");
        Ok(StoredImage {
            public_url: self.public_url(bucket, &rel),
            path: rel,
        })
    }

    /// Remove a previously stored image.
    pub async fn delete(&self, bucket: &str, file_path: &str) -> Result<()> {
        tokio::fs::remove_file(self.root.join(bucket).join(file_path))
            .await
            .with_context(|| format!("Failed to delete image {file_path}"))?;
        info!(bucket, path = file_path, "deleted image");
        Ok(())
    }

    /// Delete the old image, then store the new one.
    pub async fn replace(
        &self,
        bucket: &str,
        folder: &str,
        old_file_path: &str,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<StoredImage> {
        self.delete(bucket, old_file_path)
            .await
            .context("Failed to delete old image")?;
        self.upload(bucket, folder, original_name, bytes).await
    }

    pub fn public_url(&self, bucket: &str, file_path: &str) -> String {
        format!("{}/storage/{}/{}", self.public_base, bucket, file_path)
    }

    /// Recover the bucket-relative path from a public URL produced by
    /// this store. Returns None for foreign URLs.
    pub fn path_from_public_url(&self, bucket: &str, url: &str) -> Option<String> {
        let marker = format!("/storage/{bucket}/");
        let idx = url.find(&marker)?;
        let path = &url[idx + marker.len()..];
        if path.is_empty() {
            None
        } else {
            Some(path.to_string())
        }
    }

    /// Best-effort cleanup of a published image. Failures are logged
    /// and swallowed; callers deleting a parent record must not fail
    /// because its image was already gone.
    pub async fn delete_public_url(&self, bucket: &str, url: &str) {
        match self.path_from_public_url(bucket, url) {
            Some(path) => {
                if let Err(e) = self.delete(bucket, &path).await {
                    warn!(error = %e, url, "image cleanup failed (non-fatal)");
                }
            }
            None => warn!(url, "image cleanup skipped: unrecognized public url"),
        }
    }
}
