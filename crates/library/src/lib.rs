//! Tree walking, cataloguing and migration operations.
//!
//! The operations a front-end drives, as async event streams: [`crawl`]
//! walks a remote folder tree and records what it finds, [`migrate`]
//! re-parents every file under a set of source folders into a destination.
//! Streams are `Send`; a front-end runs them on a worker task and drains
//! events on its own control thread, so no UI-owned state is ever touched
//! off-thread.

pub mod crawl;
pub mod error;
pub mod migrate;

pub use crate::crawl::{CrawlEvent, TraversalResult, crawl, walk};
pub use crate::migrate::{FolderCatalog, MigrateEvent, MigrationPlan, migrate};
