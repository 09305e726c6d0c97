//! Analysis API access: HTTP client and response models

pub mod client;
pub mod types;

pub use client::{ApiClient, ApiError, API_KEY_HEADER};
pub use types::{MediaItem, MediaPage, ResultsSummary, SummaryMetadata, UploadTarget};
