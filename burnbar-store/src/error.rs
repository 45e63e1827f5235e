//! Store error types.

use thiserror::Error;

/// Errors that can occur in the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Probe output rejected at the ingestion boundary.
    #[error("Probe output rejected: {0}")]
    InvalidProbe(#[from] burnbar_core::CoreError),
}
