use crate::crawl::walker::walk_inner;
use crate::error::{ErrorKind as LibraryErrorKind, Result as LibraryResult};
use crate::migrate::error::{ErrorKind as MigrateErrorKind, Result as MigrateResult};
use crate::migrate::plan::{FolderCatalog, MigrationPlan};
use async_stream::stream;
use exn::ResultExt;
use futures::{Stream, TryStreamExt};
use skiff_extract::IndexPattern;
use skiff_remote::{ItemId, RemoteItem, RemoteStore, pages};
use std::pin::{Pin, pin};

/// Progress events emitted by [`migrate`].
///
/// Events follow a strict ordering:
/// 1. [`Started`](Self::Started) — exactly once.
/// 2. [`CountComplete`](Self::CountComplete) — exactly once, with the total
///    number of files reachable under the sources (the progress maximum).
/// 3. [`Moved`](Self::Moved) — zero or more times, one per re-parented
///    file, carrying the running count.
/// 4. [`Complete`](Self::Complete) — exactly once, signalling the stream
///    is finished.
///
/// An invalid plan yields a single `Err` before anything else — in
/// particular before any remote call. A remote failure terminates the
/// stream early; files already moved stay moved.
pub enum MigrateEvent {
    /// The plan passed validation and migration has begun.
    Started,
    /// The counting phase finished; this is the progress maximum.
    CountComplete(u64),
    /// One file was re-parented into the destination.
    Moved {
        id: ItemId,
        name: String,
        /// Running count of files moved so far, `1..=total`.
        moved: u64,
    },
    /// All files under every source were moved; the stream is finished.
    Complete,
}

/// Streams [`MigrateEvent`]s while re-parenting every file under the
/// plan's sources into its destination.
///
/// Two phases over the same traversal: first count every reachable file
/// (records discarded), then move them one atomic re-parent at a time.
/// Both phases recurse into subfolders and page through listings in
/// listing order, strictly sequentially.
///
/// The stream is `Send`; run it on a worker task and forward events over
/// a channel to whatever owns the progress display.
pub fn migrate<'a>(
    remote: &'a dyn RemoteStore,
    plan: &'a MigrationPlan,
    catalog: &'a FolderCatalog,
) -> impl Stream<Item = LibraryResult<MigrateEvent>> + Send + 'a {
    stream! {
        for await event in migrate_inner(remote, plan, catalog) {
            yield event.or_raise(|| LibraryErrorKind::Migrate);
        }
    }
}

fn migrate_inner<'a>(
    remote: &'a dyn RemoteStore,
    plan: &'a MigrationPlan,
    catalog: &'a FolderCatalog,
) -> impl Stream<Item = MigrateResult<MigrateEvent>> + Send + 'a {
    // `rustfmt` does not format macros that use braces. Wrap in parentheses!
    stream!({
        if let Err(e) = plan.validate(catalog) {
            yield Err(e);
            return;
        }
        yield Ok(MigrateEvent::Started);

        // Phase 1: size the progress indicator. The walk's records are
        // discarded; only the aggregate count matters here.
        let pattern = IndexPattern::default();
        let mut total = 0;
        for source in plan.sources() {
            match walk_inner(remote, source, &pattern).await {
                Ok(result) => total += result.files,
                Err(e) => {
                    yield Err(e).or_raise(|| MigrateErrorKind::Count);
                    return;
                },
            }
        }
        yield Ok(MigrateEvent::CountComplete(total));

        // Phase 2: move. Same traversal shape as the count, one atomic
        // re-parent per file, first failure stops the loop.
        let mut moved = 0;
        for source in plan.sources() {
            for await item in move_tree(remote, source.clone(), plan.destination()) {
                match item {
                    Ok(item) => {
                        moved += 1;
                        tracing::debug!(file = %item.id, moved, total, "re-parented file");
                        yield Ok(MigrateEvent::Moved { id: item.id, name: item.name, moved });
                    },
                    Err(e) => {
                        yield Err(e);
                        return;
                    },
                }
            }
        }

        yield Ok(MigrateEvent::Complete);
    })
}

/// Depth-first move of every file under `folder` into `destination`,
/// yielding each file after its re-parent succeeds.
///
/// The folder's listing is drained in full before the first mutation:
/// re-parenting a file out of `folder` shifts the remaining listing, and a
/// continuation token taken after that shift would skip past unmoved
/// files.
///
/// Boxed because the stream recurses into subfolders.
fn move_tree<'a>(
    remote: &'a dyn RemoteStore,
    folder: ItemId,
    destination: &'a ItemId,
) -> Pin<Box<dyn Stream<Item = MigrateResult<RemoteItem>> + Send + 'a>> {
    Box::pin(stream!({
        let mut items = Vec::new();
        {
            let mut listing = pin!(pages(remote, &folder));
            loop {
                match listing.try_next().await.or_raise(|| MigrateErrorKind::Remote) {
                    Ok(Some(page)) => items.extend(page.items),
                    Ok(None) => break,
                    Err(e) => {
                        yield Err(e);
                        return;
                    },
                }
            }
        }
        for item in items {
            if item.is_folder() {
                for await moved in move_tree(remote, item.id.clone(), destination) {
                    let failed = moved.is_err();
                    yield moved;
                    if failed {
                        return;
                    }
                }
            } else {
                // The file leaves the folder it was listed under, not
                // whatever other parents it may report.
                match remote.reparent(&item.id, destination, &folder).await.or_raise(|| MigrateErrorKind::Remote) {
                    Ok(()) => yield Ok(item),
                    Err(e) => {
                        yield Err(e);
                        return;
                    },
                }
            }
        }
    }))
}
