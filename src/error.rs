//! Error types for tinycol
//!
//! Provides a unified error type for all table, index and snapshot operations.

use thiserror::Error;

/// Result type alias using TableError
pub type Result<T> = std::result::Result<T, TableError>;

/// Unified error type for tinycol operations
///
/// Every failing operation leaves the table exactly as it was before the call.
#[derive(Debug, Error)]
pub enum TableError {
    // -------------------------------------------------------------------------
    // Row Lifecycle Errors
    // -------------------------------------------------------------------------
    /// Capacity reached and no reclaimed slot is available
    #[error("Table is full")]
    Full,

    // -------------------------------------------------------------------------
    // Type / Schema Errors
    // -------------------------------------------------------------------------
    /// Disabled or unordered column type, or a duplicate primary key
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// Unknown column name
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed arguments (wrong arity, mismatched value type, bad schema)
    #[error("Invalid argument: {0}")]
    Invalid(String),

    // -------------------------------------------------------------------------
    // Index Errors
    // -------------------------------------------------------------------------
    /// Sort index was never built or has been dropped
    #[error("Index is empty (not built or dropped)")]
    Empty,

    // -------------------------------------------------------------------------
    // Persistence Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot corruption detected: {0}")]
    Corrupt(String),
}
