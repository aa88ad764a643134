//! Document index extraction from remote file names.
//!
//! Scanned documents are named after the register entry they belong to:
//! an index token (`CKS` followed by a run of digits), optionally a scan
//! date and a disambiguator for multi-part scans, optionally a `.pdf`
//! extension. This crate turns such a name back into its structured parts.
//!
//! Extraction is a pure function over the file name: a name that does not
//! match the pattern is simply not an indexed document (`None`), never an
//! error.

mod consts;
mod extract;
mod models;

pub use crate::extract::{IndexPattern, extract_index};
pub use crate::models::DocIndex;

/// The default index prefix token. Case-sensitive.
pub const DEFAULT_PREFIX: &str = "CKS";
