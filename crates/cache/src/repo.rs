//! Repository for document records.

use crate::Database;
use crate::error::{ErrorKind, Result};
use crate::models::{DocumentRow, FileRecord};
use exn::ResultExt;
use sqlx::SqlitePool;

/// Repository for the `documents` table.
///
/// The table is append-only: every walk inserts the records it discovered
/// and nothing is deduplicated against prior walks. Consumers that want a
/// fresh view re-walk and read the new rows.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl From<&Database> for Repository {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone() }
    }
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a single record.
    pub async fn insert(&self, record: &FileRecord) -> Result<()> {
        sqlx::query(include_str!("../queries/insert_document.sql"))
            .bind(&record.name)
            .bind(&record.doc_index)
            .bind(&record.folder)
            .bind(&record.url)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(())
    }

    /// Insert a batch of records in one transaction.
    ///
    /// All-or-nothing: if any insert fails, no row from the batch remains.
    /// This is what makes the collect-then-persist discipline of a walk
    /// hold — a failed traversal persists nothing.
    pub async fn insert_all(&self, records: &[FileRecord]) -> Result<u64> {
        let mut tx = self.pool.begin().await.or_raise(|| ErrorKind::Database)?;
        for record in records {
            sqlx::query(include_str!("../queries/insert_document.sql"))
                .bind(&record.name)
                .bind(&record.doc_index)
                .bind(&record.folder)
                .bind(&record.url)
                .execute(&mut *tx)
                .await
                .or_raise(|| ErrorKind::Database)?;
        }
        tx.commit().await.or_raise(|| ErrorKind::Database)?;
        // Infallible: a usize will always fit in a u64.
        Ok(u64::try_from(records.len()).unwrap_or(0))
    }

    /// All rows in insertion order; the table-view consumer reads this.
    pub async fn list(&self) -> Result<Vec<DocumentRow>> {
        sqlx::query_as(include_str!("../queries/list_documents.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)
    }

    /// Number of rows currently in the table.
    pub async fn count(&self) -> Result<u64> {
        let row: (i64,) = sqlx::query_as(include_str!("../queries/count_documents.sql"))
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(u64::try_from(row.0).unwrap_or(0))
    }
}
