//! Error types for schema dumping.

use thiserror::Error;

use crate::dialect::Dialect;

/// The main error type for dump operations.
///
/// Every variant is fatal: a dump either completes or aborts with one of
/// these, there is no partial result.
#[derive(Debug, Error)]
pub enum DumpError {
    /// Could not open the database connection.
    #[error("Connection error: {0}")]
    Connection(String),

    /// A catalog query failed.
    #[error("Database error: {0}")]
    Database(String),

    /// The catalog reported a native type the dialect's type table lacks.
    #[error("Unmapped {dialect} type: '{native}'")]
    UnmappedType { dialect: Dialect, native: String },

    /// A catalog row is missing a field or holds the wrong kind of value.
    #[error("Malformed catalog row: field '{field}' {reason}")]
    MalformedRow { field: String, reason: String },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Writing the migration document failed.
    #[error("Render error: {0}")]
    Render(#[from] std::fmt::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DumpError {
    /// Create a malformed row error for the given field.
    pub fn malformed(field: impl ToString, reason: impl Into<String>) -> Self {
        Self::MalformedRow {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Create an unmapped type error.
    pub fn unmapped(dialect: Dialect, native: impl Into<String>) -> Self {
        Self::UnmappedType {
            dialect,
            native: native.into(),
        }
    }
}

/// Result type alias for dump operations.
pub type DumpResult<T> = Result<T, DumpError>;
