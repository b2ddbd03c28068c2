//! Domain error types.

use thiserror::Error;

/// Top-level domain error type shared by the CRUD-style contexts.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The caller is not allowed to access the record.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
