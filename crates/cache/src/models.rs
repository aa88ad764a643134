//! Row models for the `documents` table.

/// A discovered file, ready to be persisted.
///
/// Created during a tree walk, inserted once, never updated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Remote display name of the file.
    pub name: String,
    /// Extracted register index; `None` when the name doesn't carry one.
    pub doc_index: Option<String>,
    /// Display name of the containing folder at discovery time.
    pub folder: String,
    /// Browser-viewable link, empty when the remote provides none.
    pub url: String,
}

/// A persisted document row, identity key included.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct DocumentRow {
    pub id: i64,
    pub name: String,
    pub doc_index: Option<String>,
    pub folder: String,
    pub url: String,
}

impl From<DocumentRow> for FileRecord {
    fn from(row: DocumentRow) -> Self {
        Self { name: row.name, doc_index: row.doc_index, folder: row.folder, url: row.url }
    }
}
