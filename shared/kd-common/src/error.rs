//! Common Error Types

use thiserror::Error;

/// Errors raised while interpreting shared domain values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A role name that is not part of the closed role set.
    #[error("Unknown role: {0}")]
    UnknownRole(String),
}

/// Result alias for common operations.
pub type Result<T> = std::result::Result<T, Error>;
