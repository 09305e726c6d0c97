//! rdt-up library interface
//!
//! Uploads local files to the analysis API and records the job id assigned
//! to each one.

pub mod scanner;
pub mod uploader;

pub use scanner::{FileScanner, ScanError};
pub use uploader::{UploadError, UploadSummary, Uploader};
