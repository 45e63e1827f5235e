//! Core error types for `BurnBar`.
//!
//! The aggregation pipeline absorbs malformed input rather than
//! erroring, so the surface here is small: only validation that
//! callers must not silently swallow.

use thiserror::Error;

/// Core error type for `BurnBar` operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Provider id failed validation.
    #[error("Invalid provider id: {0:?}")]
    InvalidProviderId(String),
}
