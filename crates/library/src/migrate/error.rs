//! Error types for the [`migrate`](super) module.
//!
//! Uses [`exn`] for automatic location tracking and error tree construction.

use derive_more::{Display, Error};

/// A migration error with automatic location tracking via [`exn::Exn`].
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for migration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies the origin of a migration failure.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The plan was rejected before any remote call was made.
    #[display("invalid migration plan: {_0}")]
    Plan(#[error(not(source))] String),
    /// The counting walk over a source folder failed.
    #[display("could not count files under a source folder")]
    Count,
    /// A listing or re-parent call failed during the move phase.
    /// Already-moved files stay moved.
    #[display("could not move files on the remote store")]
    Remote,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Remote)
    }
}
