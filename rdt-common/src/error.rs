//! Common error types for rdt

use thiserror::Error;

/// Common result type for rdt operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that end a tool run before per-item processing starts
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read or write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input or command-line argument
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Input table lacks one or more required columns
    #[error("CSV file must contain the columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}
