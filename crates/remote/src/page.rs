//! Lazy pagination helpers.
//!
//! A paginated listing is modelled as a finite stream of [`Page`]s: each
//! element is fetched on demand by handing the previous page's continuation
//! token back to the backend, until the token comes back absent. The stream
//! is restartable only by calling the helper again.

use crate::backend::RemoteStore;
use crate::error::Result;
use crate::models::{ItemId, Page, RemoteItem};
use async_stream::stream;
use futures::Stream;

/// Stream the pages of a container's immediate children.
///
/// An empty first page means the container has no children. A listing
/// failure ends the stream with the error; no further pages are fetched.
///
/// # Examples
///
/// ```no_run
/// use futures::TryStreamExt;
/// use skiff_remote::{ItemId, RemoteStore, pages};
/// # async fn example(remote: &dyn RemoteStore) -> skiff_remote::error::Result<()> {
/// let folder = ItemId::from("root");
/// let mut listing = std::pin::pin!(pages(remote, &folder));
/// while let Some(page) = listing.try_next().await? {
///     println!("{} items", page.items.len());
/// }
/// # Ok(())
/// # }
/// ```
pub fn pages<'a>(remote: &'a dyn RemoteStore, folder: &'a ItemId) -> impl Stream<Item = Result<Page>> + Send + 'a {
    stream! {
        let mut token = None;
        loop {
            let page = match remote.list_children(folder, token.as_ref()).await {
                Ok(page) => page,
                Err(e) => {
                    yield Err(e);
                    return;
                },
            };
            token = page.next.clone();
            let done = token.is_none();
            yield Ok(page);
            if done {
                return;
            }
        }
    }
}

/// Drain the paginated folder listing into a single flat `Vec`.
///
/// This is the complete set of containers the credential can see, in
/// listing order.
pub async fn list_all_folders(remote: &dyn RemoteStore) -> Result<Vec<RemoteItem>> {
    let mut folders = Vec::new();
    let mut token = None;
    loop {
        let page = remote.list_folders(token.as_ref()).await?;
        folders.extend(page.items);
        match page.next {
            Some(next) => token = Some(next),
            None => break,
        }
    }
    Ok(folders)
}
