//! File uploader
//!
//! Per file:
//! 1. Ask the API for a signed write URL and job id (502 retried with a
//!    fixed delay, any other failure ends this file)
//! 2. Read the file and PUT its bytes to the signed URL (never retried)
//! 3. Record (file_name, request_id, file_path)
//!
//! A failed file is logged and skipped; the batch always continues.

use crate::scanner::{FileScanner, ScanError};
use rdt_common::api::{ApiClient, ApiError, UploadTarget};
use rdt_common::UploadRecord;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Upload errors
#[derive(Debug, Error)]
pub enum UploadError {
    /// Could not obtain a signed URL and job id
    #[error("Failed to get signed URL: {0}")]
    Target(#[source] ApiError),

    /// Local file could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// PUT to the signed URL failed
    #[error("File upload failed: {0}")]
    Transfer(#[source] ApiError),

    /// Upload path is not a file or directory
    #[error(transparent)]
    Scan(#[from] ScanError),
}

/// Outcome counts for one batch
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UploadSummary {
    pub attempted: usize,
    pub uploaded: usize,
    pub failed: usize,
}

/// Uploads files through an [`ApiClient`]
pub struct Uploader {
    client: ApiClient,
    scanner: FileScanner,
}

impl Uploader {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            scanner: FileScanner::new(),
        }
    }

    /// Upload a file, or every file under a directory
    ///
    /// Successful uploads are appended to `manifest` in discovery order.
    /// Only an invalid `path` is an error; per-file failures are counted in
    /// the returned summary.
    pub async fn upload_path(
        &self,
        path: &Path,
        manifest: &mut Vec<UploadRecord>,
    ) -> Result<UploadSummary, UploadError> {
        let files = self.scanner.scan(path)?;
        tracing::info!(
            path = %path.display(),
            files = files.len(),
            "Starting upload"
        );

        let mut summary = UploadSummary::default();
        for file in &files {
            summary.attempted += 1;
            match self.upload_one(file).await {
                Ok(record) => {
                    summary.uploaded += 1;
                    manifest.push(record);
                }
                Err(e) => {
                    summary.failed += 1;
                    tracing::warn!(file = %file.display(), "{}", e);
                }
            }
        }

        Ok(summary)
    }

    /// Upload a single file
    pub async fn upload_one(&self, path: &Path) -> Result<UploadRecord, UploadError> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let target = self
            .request_upload_target(&file_name)
            .await
            .map_err(UploadError::Target)?;

        let bytes = tokio::fs::read(path).await.map_err(|source| UploadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let size = bytes.len();

        self.client
            .put_signed(&target.signed_url, bytes)
            .await
            .map_err(UploadError::Transfer)?;

        tracing::info!(
            file = %file_name,
            request_id = %target.request_id,
            bytes = size,
            "File upload successful"
        );

        Ok(UploadRecord {
            file_name,
            request_id: target.request_id,
            file_path: path.display().to_string(),
        })
    }

    /// Request a signed URL, retrying transient gateway failures
    async fn request_upload_target(&self, file_name: &str) -> Result<UploadTarget, ApiError> {
        let policy = &self.client.config().retry;
        let mut attempt = 0;

        loop {
            attempt += 1;

            match self.client.create_upload_target(file_name).await {
                Ok(target) => {
                    if attempt > 1 {
                        tracing::debug!(file = %file_name, attempt, "Upload target obtained after retry");
                    }
                    return Ok(target);
                }
                Err(err) if err.is_transient() && attempt < policy.max_attempts => {
                    tracing::warn!(
                        file = %file_name,
                        attempt,
                        max_attempts = policy.max_attempts,
                        delay_ms = policy.delay.as_millis() as u64,
                        "{}, retrying",
                        err
                    );
                    tokio::time::sleep(policy.delay).await;
                }
                Err(err) => {
                    if err.is_transient() {
                        tracing::error!(file = %file_name, attempt, "Max retries reached");
                    }
                    return Err(err);
                }
            }
        }
    }
}
