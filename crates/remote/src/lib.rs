//! Remote drive abstraction for skiff.
//!
//! This crate defines the [`RemoteStore`] trait, a narrow interface over a
//! cloud file-storage API: paginated child listing, folder-name lookup, a
//! flat paginated folder listing for pickers, and the atomic re-parent
//! mutation used to move files between folders. Everything downstream
//! (tree walking, cataloguing, migration) consumes the trait, never a
//! concrete API client.

pub mod auth;
pub mod backend;
pub mod error;
mod models;
mod page;

pub use crate::backend::RemoteStore;
pub use crate::models::{ItemId, ItemKind, Page, PageToken, RemoteItem};
pub use crate::page::{list_all_folders, pages};
