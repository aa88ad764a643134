//! Remote Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use crate::models::ItemId;
use derive_more::{Display, Error};

/// A remote error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for remote operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The referenced item does not exist (or is not visible to the credential)
    #[display("item not found: {_0}")]
    NotFound(#[error(not(source))] ItemId),
    /// The credential is not allowed to perform the operation
    #[display("permission denied: {_0}")]
    PermissionDenied(#[error(not(source))] ItemId),
    /// The remote API rejected the call due to usage limits
    #[display("quota exceeded")]
    QuotaExceeded,
    /// Transport-level failure (DNS, TLS, timeouts, connection resets)
    #[display("network error: {_0}")]
    Network(#[error(not(source))] String),
    /// The remote API answered with something we could not interpret
    #[display("invalid response: {_0}")]
    InvalidResponse(#[error(not(source))] String),
    /// Credential acquisition or refresh failed
    #[display("authentication error: {_0}")]
    Auth(#[error(not(source))] String),
    /// Backend-specific error
    #[display("backend error: {_0}")]
    Backend(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::QuotaExceeded | Self::Network(_) | Self::Backend(_))
    }
}
