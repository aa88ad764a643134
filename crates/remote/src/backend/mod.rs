//! Remote store trait and implementations.
//!
//! This module defines the `RemoteStore` trait, which provides a unified
//! interface for the handful of remote operations skiff needs: paginated
//! listings, name resolution, and the re-parent mutation. Backends perform
//! one network round-trip per call; callers decide where that work runs.

#[cfg(feature = "drive")]
mod drive;
#[cfg(feature = "mock")]
mod mock;

#[cfg(feature = "drive")]
pub use self::drive::DriveStore;
#[cfg(feature = "mock")]
pub use self::mock::MockRemote;
use crate::error::Result;
use crate::models::{ItemId, Page, PageToken};
use async_trait::async_trait;

/// Unified interface for remote file-storage backends.
///
/// The trait is deliberately narrow: it is the complete set of remote
/// capabilities the cataloguing and migration operations consume, and a
/// test double ([`MockRemote`]) can implement it without any network.
///
/// # Pagination
/// Both listing methods return a [`Page`] whose `next` token must be handed
/// back verbatim until it comes back absent. [`pages`](crate::pages) wraps
/// that loop as a lazy stream.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Name of the configured backend (used for logging only).
    fn name(&self) -> &str;

    /// List one page of the immediate children of a container.
    ///
    /// Child order within a page is whatever the remote system returns; it
    /// is not specified and must be treated as non-deterministic across
    /// calls. Trashed/deleted items are excluded.
    async fn list_children(&self, folder: &ItemId, token: Option<&PageToken>) -> Result<Page>;

    /// Resolve a container's display name from its identifier.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if the
    /// identifier does not resolve.
    async fn folder_name(&self, folder: &ItemId) -> Result<String>;

    /// List one page of every container the credential can see.
    ///
    /// Used to populate folder pickers and to build the folder snapshot
    /// that migration plans are validated against. The listing is paginated
    /// like any other; [`list_all_folders`](crate::list_all_folders) drains
    /// it in full.
    async fn list_folders(&self, token: Option<&PageToken>) -> Result<Page>;

    /// Atomically re-parent a file: add `add_parent` and remove
    /// `remove_parent` in a single remote mutation.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if the file
    /// does not exist.
    async fn reparent(&self, file: &ItemId, add_parent: &ItemId, remove_parent: &ItemId) -> Result<()>;
}
