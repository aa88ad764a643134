//! SQLite store for catalogued document records.
//!
//! The store is not the source of truth — the remote drive is. It holds
//! the flat `documents` table that walks append into and table views read
//! back out. Deleting the database file loses nothing that a re-walk
//! cannot rebuild.
//!
//! Rows are append-only: every walk inserts the records it discovered,
//! with no deduplication against earlier walks.

mod db;
pub mod error;
mod models;
mod repo;

pub use crate::db::Database;
pub use crate::models::{DocumentRow, FileRecord};
pub use crate::repo::Repository;
