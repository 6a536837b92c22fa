//! Unified error types for the treasury core.
//!
//! Validation failures carry user-readable context and are raised before any
//! row is written; store failures wrap `sea_orm::DbErr` so callers can tell a
//! retryable connectivity problem apart from bad input.

use thiserror::Error;

/// All errors produced by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file or environment problem
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of what failed
        message: String,
    },

    /// A project id was referenced that does not exist
    #[error("Project not found: {id}")]
    ProjectNotFound {
        /// The missing project id
        id: i64,
    },

    /// A status value outside the accepted vocabulary
    #[error("Invalid status: {status}")]
    InvalidStatus {
        /// The rejected status string
        status: String,
    },

    /// A monetary amount that fails validation (negative price, non-positive revenue, NaN)
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// A negative expense quantity
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity {
        /// The rejected quantity
        quantity: i32,
    },

    /// Input rejected before any write was attempted
    #[error("Validation error: {message}")]
    Validation {
        /// What the caller got wrong
        message: String,
    },

    /// Underlying store failure (connectivity, constraint, timeout)
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error reading configuration
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether a failed operation is safe to retry blindly.
    ///
    /// Store errors on read paths are; validation and not-found errors are
    /// deterministic and will fail again with the same input.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_policy() {
        // Store failures may be retried; deterministic rejections may not
        assert!(Error::Database(sea_orm::DbErr::Custom("timeout".to_string())).is_retryable());
        assert!(
            !Error::InvalidStatus {
                status: "archived".to_string()
            }
            .is_retryable()
        );
        assert!(!Error::ProjectNotFound { id: 1 }.is_retryable());
    }
}
