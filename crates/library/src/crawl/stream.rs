use crate::crawl::error::{ErrorKind as CrawlErrorKind, Result as CrawlResult};
use crate::crawl::walker::walk_inner;
use crate::error::{ErrorKind as LibraryErrorKind, Result as LibraryResult};
use async_stream::stream;
use exn::ResultExt;
use futures::Stream;
use skiff_cache::Repository;
use skiff_extract::IndexPattern;
use skiff_remote::{ItemId, RemoteStore};

/// Progress events emitted by [`crawl`] as it catalogues a folder tree.
///
/// Events follow a strict ordering:
/// 1. [`Started`](Self::Started) — exactly once.
/// 2. [`Walked`](Self::Walked) — exactly once, when the traversal is done
///    and the aggregate leaf count is known.
/// 3. [`Recorded`](Self::Recorded) — exactly once, after the records have
///    been persisted.
/// 4. [`Complete`](Self::Complete) — exactly once, signalling the stream
///    is finished.
///
/// An error terminates the stream early, in which case nothing has been
/// persisted: records are inserted in one transaction only after the walk
/// completes.
pub enum CrawlEvent {
    /// Crawling has begun; emitted exactly once before any other event.
    Started,
    /// The traversal finished; the aggregate leaf count is now known.
    Walked { files: u64 },
    /// All walked records were persisted in a single transaction.
    Recorded { rows: u64 },
    /// The operation is finished; the stream yields nothing further.
    Complete,
}

/// Streams [`CrawlEvent`]s while walking `folder` and recording every
/// discovered file into the [`Repository`].
///
/// The traversal is pure; persistence happens strictly after it completes.
/// A remote failure anywhere in the tree therefore persists nothing, and a
/// persistence failure rolls the whole batch back.
pub fn crawl<'a>(
    remote: &'a dyn RemoteStore,
    cache: &'a Repository,
    folder: &'a ItemId,
    pattern: &'a IndexPattern,
) -> impl Stream<Item = LibraryResult<CrawlEvent>> + Send + 'a {
    stream! {
        for await event in crawl_inner(remote, cache, folder, pattern) {
            yield event.or_raise(|| LibraryErrorKind::Crawl);
        }
    }
}

fn crawl_inner<'a>(
    remote: &'a dyn RemoteStore,
    cache: &'a Repository,
    folder: &'a ItemId,
    pattern: &'a IndexPattern,
) -> impl Stream<Item = CrawlResult<CrawlEvent>> + Send + 'a {
    // `rustfmt` does not format macros that use braces. Wrap in parentheses!
    stream!({
        yield Ok(CrawlEvent::Started);

        let result = match walk_inner(remote, folder, pattern).await {
            Ok(result) => result,
            Err(e) => {
                yield Err(e);
                return;
            },
        };
        yield Ok(CrawlEvent::Walked { files: result.files });

        let rows = match cache.insert_all(&result.records).await.or_raise(|| CrawlErrorKind::Cache) {
            Ok(rows) => rows,
            Err(e) => {
                yield Err(e);
                return;
            },
        };
        yield Ok(CrawlEvent::Recorded { rows });

        yield Ok(CrawlEvent::Complete);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use skiff_cache::Database;
    use skiff_remote::backend::MockRemote;

    async fn cache() -> (Database, Repository) {
        let db = Database::connect_in_memory().await.unwrap();
        let repo = Repository::from(&db);
        (db, repo)
    }

    fn tree() -> MockRemote {
        MockRemote::new()
            .folder("root", "Archive")
            .file_in("a", "CKS 1.pdf", "root")
            .folder_in("sub", "Scans", "root")
            .file_in("b", "CKS 2.pdf", "sub")
    }

    #[tokio::test]
    async fn crawl_walks_then_records() {
        let (db, repo) = cache().await;
        let remote = tree();
        let folder = ItemId::from("root");
        let pattern = IndexPattern::default();
        let events: Vec<_> = crawl(&remote, &repo, &folder, &pattern).collect().await;

        assert_eq!(events.len(), 4);
        assert!(matches!(events[0], Ok(CrawlEvent::Started)));
        assert!(matches!(events[1], Ok(CrawlEvent::Walked { files: 2 })));
        assert!(matches!(events[2], Ok(CrawlEvent::Recorded { rows: 2 })));
        assert!(matches!(events[3], Ok(CrawlEvent::Complete)));

        let rows = repo.list().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].folder, "Archive");
        assert_eq!(rows[1].folder, "Scans");
        db.close().await;
    }

    #[tokio::test]
    async fn failed_walk_persists_nothing() {
        let (db, repo) = cache().await;
        // The failure is in a subfolder, after the root leaf was already
        // discovered; the already-gathered records must still be discarded.
        let remote = tree().fail_listing_for("sub");
        let folder = ItemId::from("root");
        let pattern = IndexPattern::default();
        let events: Vec<_> = crawl(&remote, &repo, &folder, &pattern).collect().await;

        assert!(matches!(events[0], Ok(CrawlEvent::Started)));
        assert!(events[1].is_err());
        assert_eq!(events.len(), 2, "no events after the error");
        assert_eq!(repo.count().await.unwrap(), 0);
        db.close().await;
    }

    #[tokio::test]
    async fn crawling_twice_appends() {
        let (db, repo) = cache().await;
        let remote = tree();
        let folder = ItemId::from("root");
        let pattern = IndexPattern::default();
        let _: Vec<_> = crawl(&remote, &repo, &folder, &pattern).collect().await;
        let _: Vec<_> = crawl(&remote, &repo, &folder, &pattern).collect().await;
        assert_eq!(repo.count().await.unwrap(), 4);
        db.close().await;
    }

    #[tokio::test]
    async fn empty_folder_crawl() {
        let (db, repo) = cache().await;
        let remote = MockRemote::new().folder("empty", "Empty");
        let folder = ItemId::from("empty");
        let pattern = IndexPattern::default();
        let events: Vec<_> = crawl(&remote, &repo, &folder, &pattern).collect().await;
        assert!(matches!(events[1], Ok(CrawlEvent::Walked { files: 0 })));
        assert!(matches!(events[2], Ok(CrawlEvent::Recorded { rows: 0 })));
        assert_eq!(repo.count().await.unwrap(), 0);
        db.close().await;
    }
}
