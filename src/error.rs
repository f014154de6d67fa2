//! Error types for the feedrank library.
//!
//! All fallible operations return [`FeedrankError`] through the crate-wide
//! [`Result`] alias.
//!
//! # Examples
//!
//! ```
//! use feedrank::error::{FeedrankError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(FeedrankError::configuration("alpha must lie in [0, 1]"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for feedrank operations.
#[derive(Error, Debug)]
pub enum FeedrankError {
    /// Invalid retrieval parameters (`alpha`, `mu`, `top_k`).
    ///
    /// Raised before any index access takes place.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The index-access interface could not answer a request.
    #[error("Index access error: {0}")]
    IndexAccess(String),

    /// Query-related errors (malformed query files, etc.)
    #[error("Query error: {0}")]
    Query(String),

    /// I/O errors (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with FeedrankError.
pub type Result<T> = std::result::Result<T, FeedrankError>;

impl FeedrankError {
    /// Create a new configuration error.
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        FeedrankError::Configuration(msg.into())
    }

    /// Create a new index access error.
    pub fn index_access<S: Into<String>>(msg: S) -> Self {
        FeedrankError::IndexAccess(msg.into())
    }

    /// Create a new query error.
    pub fn query<S: Into<String>>(msg: S) -> Self {
        FeedrankError::Query(msg.into())
    }

    /// Create a new not found error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        FeedrankError::IndexAccess(format!("Not found: {}", msg.into()))
    }

    /// Whether this error was raised by parameter validation.
    pub fn is_configuration(&self) -> bool {
        matches!(self, FeedrankError::Configuration(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = FeedrankError::configuration("mu must be positive");
        assert_eq!(error.to_string(), "Configuration error: mu must be positive");
        assert!(error.is_configuration());

        let error = FeedrankError::index_access("missing document");
        assert_eq!(error.to_string(), "Index access error: missing document");
        assert!(!error.is_configuration());

        let error = FeedrankError::not_found("doc FT911-3");
        assert_eq!(error.to_string(), "Index access error: Not found: doc FT911-3");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let feedrank_error = FeedrankError::from(io_error);

        match feedrank_error {
            FeedrankError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }
}
