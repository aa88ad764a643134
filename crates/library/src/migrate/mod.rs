//! Bulk migration of files between remote folders.
//!
//! A [`MigrationPlan`] names a set of distinct source folders and exactly
//! one destination. The plan is validated *before any remote mutation*
//! against a [`FolderCatalog`] snapshot — a destination that equals a
//! source, or sits anywhere inside a source's subtree, is rejected so a
//! folder's files are never migrated into themselves.
//!
//! [`migrate`] then runs two phases: count every reachable file (to size a
//! progress indicator), then re-parent each file into the destination, one
//! atomic mutation at a time, emitting a progress event per move. The move
//! phase recurses into subfolders exactly as counting does, so the two
//! phases always agree on the total.
//!
//! The operation is deliberately not transactional: a re-parent failure
//! stops the remaining loop, already-moved files stay moved, and the
//! failure surfaces as a single error with no per-file breakdown.

pub mod error;
mod plan;
mod stream;

pub use self::plan::{FolderCatalog, MigrationPlan};
pub use self::stream::{MigrateEvent, migrate};
