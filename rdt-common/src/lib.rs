//! # RDT Common Library
//!
//! Shared code for the rdt media-analysis tools including:
//! - API client and typed response models
//! - Upload and result record types
//! - CSV table loading, writing and joining
//! - Configuration loading (API key, host, retry policy)
//! - Command-line arguments shared by every tool

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod records;
pub mod table;

pub use error::{Error, Result};
pub use records::{AudioResultRecord, ResultRecord, UploadRecord, UNABLE_TO_EVALUATE};
pub use table::Table;
