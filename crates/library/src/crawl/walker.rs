use crate::crawl::error::{ErrorKind, Result as CrawlResult};
use crate::error::{ErrorKind as LibraryErrorKind, Result as LibraryResult};
use exn::ResultExt;
use futures::TryStreamExt;
use skiff_cache::FileRecord;
use skiff_extract::IndexPattern;
use skiff_remote::{ItemId, RemoteStore, pages};
use std::collections::HashMap;
use std::future::Future;
use std::pin::{Pin, pin};
use tracing::instrument;

/// The aggregate outcome of walking one subtree.
///
/// Ephemeral — it exists only for the duration of one traversal call.
///
/// # Invariant
/// `files` equals the subtree's direct leaf children plus the `files` of
/// every child container, which is always `records.len()`.
#[derive(Debug, Default)]
pub struct TraversalResult {
    /// Aggregate leaf count under the walked container.
    pub files: u64,
    /// Discovered records, in traversal order: siblings in listing order,
    /// a subtree's records gathered before the walk moves past its folder.
    pub records: Vec<FileRecord>,
}

/// Recursively walk a container, producing its [`TraversalResult`].
///
/// Depth-first and strictly sequential: one remote call at a time, no
/// interleaving across sibling subtrees. Sibling order is whatever the
/// listing returns — the remote system does not specify it, so it must be
/// treated as non-deterministic across calls. An empty first page means
/// the container has no children (count 0, no records).
///
/// For each leaf, the containing folder's display name is resolved from
/// the leaf's first reported parent (falling back to the folder being
/// walked when the listing reports none); lookups are memoized for the
/// duration of the walk. The [`IndexPattern`] runs against the leaf name;
/// a non-match records an absent index, never an error.
///
/// # Errors
/// A listing or name-lookup failure at any page aborts the *entire*
/// traversal, not just the current subtree. Partial results are discarded.
#[instrument(skip(remote, pattern), fields(remote = remote.name(), folder = %folder))]
pub async fn walk(remote: &dyn RemoteStore, folder: &ItemId, pattern: &IndexPattern) -> LibraryResult<TraversalResult> {
    walk_inner(remote, folder, pattern).await.or_raise(|| LibraryErrorKind::Crawl)
}

pub(crate) async fn walk_inner(
    remote: &dyn RemoteStore,
    folder: &ItemId,
    pattern: &IndexPattern,
) -> CrawlResult<TraversalResult> {
    // Folder-name lookups repeat heavily (every sibling leaf shares one
    // parent); memoize them for the duration of this walk.
    let mut names = HashMap::new();
    let result = walk_subtree(remote, folder, pattern, &mut names).await?;
    tracing::debug!(files = result.files, "walk complete");
    Ok(result)
}

fn walk_subtree<'a>(
    remote: &'a dyn RemoteStore,
    folder: &'a ItemId,
    pattern: &'a IndexPattern,
    names: &'a mut HashMap<ItemId, String>,
) -> Pin<Box<dyn Future<Output = CrawlResult<TraversalResult>> + Send + 'a>> {
    Box::pin(async move {
        let mut result = TraversalResult::default();
        let mut listing = pin!(pages(remote, folder));
        while let Some(page) = listing.try_next().await.or_raise(|| ErrorKind::Remote)? {
            for item in page.items {
                if item.is_folder() {
                    // Post-order: the subtree's records are gathered before
                    // the walk moves on to the next sibling.
                    let subtree = walk_subtree(remote, &item.id, pattern, names).await?;
                    result.files += subtree.files;
                    result.records.extend(subtree.records);
                } else {
                    let parent = item.parents.first().unwrap_or(folder);
                    let folder_name = match names.get(parent) {
                        Some(name) => name.clone(),
                        None => {
                            let name = remote.folder_name(parent).await.or_raise(|| ErrorKind::Remote)?;
                            names.insert(parent.clone(), name.clone());
                            name
                        },
                    };
                    result.records.push(FileRecord {
                        doc_index: pattern.extract_index(&item.name).map(str::to_string),
                        name: item.name,
                        folder: folder_name,
                        url: item.view_link.unwrap_or_default(),
                    });
                    result.files += 1;
                }
            }
        }
        Ok(result)
    })
}
