//! Error types for the linear hashing index.

use thiserror::Error;

/// Result type alias using LinHashError.
pub type Result<T> = std::result::Result<T, LinHashError>;

/// Errors that can occur in index operations.
#[derive(Debug, Error)]
pub enum LinHashError {
    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Directory errors
    #[error("Bucket not found: {index} (bucket count {bucket_count})")]
    BucketNotFound { index: u64, bucket_count: u64 },

    #[error("Bucket index out of range: {index} (bucket count {bucket_count})")]
    BucketOutOfRange { index: u64, bucket_count: u64 },

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid parameter: {name} = {value}")]
    InvalidParameter { name: String, value: String },
}
