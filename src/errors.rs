/*!
 * Error types for the skucheck application.
 *
 * This module contains custom error types for the persistence store and the
 * session board, using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when working with the verification store
#[derive(Error, Debug)]
pub enum StoreError {
    /// The local database could not be opened, or was never opened
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// A write transaction did not commit; nothing was written
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// A read query failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// The session cannot be recorded in its current state
    #[error("Invalid session for SKU {sku}: {reason}")]
    InvalidSession {
        /// SKU of the rejected session
        sku: String,
        /// Why it was rejected
        reason: String,
    },
}

impl StoreError {
    pub(crate) fn unavailable(error: anyhow::Error) -> Self {
        Self::StoreUnavailable(format!("{:#}", error))
    }

    pub(crate) fn transaction(error: anyhow::Error) -> Self {
        Self::TransactionFailed(format!("{:#}", error))
    }

    pub(crate) fn query(error: anyhow::Error) -> Self {
        Self::QueryFailed(format!("{:#}", error))
    }

    /// Whether the caller may retry the operation unchanged
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransactionFailed(_) | Self::QueryFailed(_))
    }
}

/// Errors raised while mutating or committing checklist sessions
#[derive(Error, Debug)]
pub enum SessionError {
    /// No product template exists for the SKU
    #[error("Unknown product SKU: {0}")]
    UnknownProduct(String),

    /// The checklist has no item with this name
    #[error("Unknown checklist item '{item}' for SKU {sku}")]
    UnknownChecklistItem {
        /// SKU of the session
        sku: String,
        /// Checklist item name that was not found
        item: String,
    },

    /// Recording stopped partway through a commit
    #[error("Commit stopped at SKU {sku} after {committed} verification(s): {source}")]
    CommitFailed {
        /// Sessions recorded (and reset) before the failure
        committed: usize,
        /// SKU whose session failed to record
        sku: String,
        /// Underlying store failure
        #[source]
        source: StoreError,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the verification store
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Error from the session board
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
