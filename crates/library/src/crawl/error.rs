//! Error types for the [`crawl`](super) module.
//!
//! Uses [`exn`] for automatic location tracking and error tree construction.

use derive_more::{Display, Error};

/// A crawl error with automatic location tracking via [`exn::Exn`].
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for crawl operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies the origin of a crawl failure.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// A remote listing or name lookup failed; the whole traversal aborts.
    #[display("could not fetch files from the remote store")]
    Remote,
    /// Persisting the walked records failed.
    #[display("could not record walked files")]
    Cache,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Remote)
    }
}
