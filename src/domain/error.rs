//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the pyramid tree rules.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Cannot delete the main message node")]
    RootDeletion,

    #[error("invalid level: {0} (expected 0, 1 or 2)")]
    InvalidLevel(u8),

    #[error("invalid pyramid: {0}")]
    InvalidPyramid(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
