//! Upload candidate discovery
//!
//! A file path yields itself; a directory is walked recursively. Entries
//! are visited in file-name order within each directory so runs over the
//! same tree produce the same manifest order.

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// File scanner errors
#[derive(Debug, Error)]
pub enum ScanError {
    /// Path is neither a file nor a directory
    #[error("{0} is not a valid file or directory")]
    PathNotFound(PathBuf),
}

/// Recursive file discovery
#[derive(Debug, Clone, Copy, Default)]
pub struct FileScanner;

impl FileScanner {
    pub fn new() -> Self {
        Self
    }

    /// Collect every regular file under `root_path`
    ///
    /// Directory symlinks are not followed; symlinks to files are included.
    /// Unreadable entries are logged and skipped.
    pub fn scan(&self, root_path: &Path) -> Result<Vec<PathBuf>, ScanError> {
        if root_path.is_file() {
            return Ok(vec![root_path.to_path_buf()]);
        }

        if !root_path.is_dir() {
            return Err(ScanError::PathNotFound(root_path.to_path_buf()));
        }

        let walker = WalkDir::new(root_path)
            .follow_links(false)
            .sort_by_file_name();

        let mut files = Vec::new();
        for entry in walker {
            match entry {
                Ok(entry) => {
                    let is_file = entry.file_type().is_file()
                        || (entry.path_is_symlink() && entry.path().is_file());
                    if is_file {
                        files.push(entry.into_path());
                    }
                }
                Err(e) => {
                    tracing::warn!("Error accessing entry: {}", e);
                }
            }
        }

        tracing::debug!(
            root = %root_path.display(),
            count = files.len(),
            "Scan complete"
        );

        Ok(files)
    }
}
