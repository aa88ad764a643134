//! In-memory remote store for testing.

use crate::backend::RemoteStore;
use crate::error::{ErrorKind, Result};
use crate::models::{ItemId, ItemKind, Page, PageToken, RemoteItem};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

/// In-memory remote store for testing.
///
/// The folder tree lives in a `HashMap` behind a [`RwLock`], so all trait
/// methods operate on `&self` without external synchronisation. Listing
/// order is insertion order, which keeps pagination tests deterministic.
/// Failures can be injected per folder (listing) and per file (re-parent).
///
/// # Examples
///
/// ```
/// use skiff_remote::backend::{MockRemote, RemoteStore};
/// use skiff_remote::ItemId;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let remote = MockRemote::new()
///     .folder("root", "My Drive")
///     .folder_in("inbox", "Inbox", "root")
///     .file_in("f1", "CKS 12.pdf", "inbox");
///
/// let page = remote.list_children(&ItemId::from("inbox"), None).await?;
/// assert_eq!(page.items.len(), 1);
/// # Ok(())
/// # }
/// ```
pub struct MockRemote {
    name: String,
    page_size: usize,
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    /// Insertion order of every item; folder-listing order follows it.
    order: Vec<ItemId>,
    items: HashMap<ItemId, RemoteItem>,
    /// Listing membership, kept separate from the parents an item
    /// *reports*: real backends sometimes list an item while omitting its
    /// parents field.
    children: HashMap<ItemId, Vec<ItemId>>,
    fail_listing: HashSet<ItemId>,
    fail_reparent: HashSet<ItemId>,
}

impl MockRemote {
    pub fn new() -> Self {
        Self {
            name: "mock".to_string(),
            page_size: 0,
            state: RwLock::new(State::default()),
        }
    }

    /// Change the name of the mock remote.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Cap every listing page at `size` items. Zero (the default) returns
    /// everything in a single page.
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    /// Add a root-level folder (no parents).
    pub fn folder(self, id: impl Into<ItemId>, name: impl Into<String>) -> Self {
        self.insert(id, name, ItemKind::Folder, None, Vec::new())
    }

    /// Add a folder inside another folder.
    pub fn folder_in(self, id: impl Into<ItemId>, name: impl Into<String>, parent: impl Into<ItemId>) -> Self {
        let parent = parent.into();
        self.insert(id, name, ItemKind::Folder, Some(parent.clone()), vec![parent])
    }

    /// Add a file inside a folder. The view link is derived from the id.
    pub fn file_in(self, id: impl Into<ItemId>, name: impl Into<String>, parent: impl Into<ItemId>) -> Self {
        let parent = parent.into();
        self.insert(id, name, ItemKind::File, Some(parent.clone()), vec![parent])
    }

    /// Add a file that is listed under a folder but reports no parents,
    /// like a backend that omits the parents field.
    pub fn orphan_file_in(self, id: impl Into<ItemId>, name: impl Into<String>, parent: impl Into<ItemId>) -> Self {
        self.insert(id, name, ItemKind::File, Some(parent.into()), Vec::new())
    }

    /// Make every `list_children` call for `folder` fail.
    pub fn fail_listing_for(mut self, folder: impl Into<ItemId>) -> Self {
        self.state.get_mut().fail_listing.insert(folder.into());
        self
    }

    /// Make every `reparent` call for `file` fail.
    pub fn fail_reparent_of(mut self, file: impl Into<ItemId>) -> Self {
        self.state.get_mut().fail_reparent.insert(file.into());
        self
    }

    /// Current parent set of an item; for test assertions.
    pub async fn parents_of(&self, id: &ItemId) -> Vec<ItemId> {
        self.state.read().await.items.get(id).map(|item| item.parents.clone()).unwrap_or_default()
    }

    fn insert(
        mut self,
        id: impl Into<ItemId>,
        name: impl Into<String>,
        kind: ItemKind,
        listed_under: Option<ItemId>,
        parents: Vec<ItemId>,
    ) -> Self {
        let id = id.into();
        let view_link = match kind {
            ItemKind::File => Some(format!("https://drive.mock/view/{id}")),
            ItemKind::Folder => None,
        };
        let item = RemoteItem { id: id.clone(), name: name.into(), kind, parents, view_link };
        let state = self.state.get_mut();
        if state.items.insert(id.clone(), item).is_none() {
            state.order.push(id.clone());
        }
        if let Some(parent) = listed_under {
            state.children.entry(parent).or_default().push(id);
        }
        self
    }

    /// Slice one page out of an already-filtered listing.
    fn paginate(&self, items: Vec<RemoteItem>, token: Option<&PageToken>) -> Result<Page> {
        let offset = match token {
            Some(token) => token
                .as_str()
                .parse::<usize>()
                .map_err(|_| exn::Exn::from(ErrorKind::InvalidResponse(format!("bad page token: {token}"))))?,
            None => 0,
        };
        let end = match self.page_size {
            0 => items.len(),
            size => (offset + size).min(items.len()),
        };
        let next = (end < items.len()).then(|| PageToken::new(end.to_string()));
        let items = items.into_iter().skip(offset).take(end.saturating_sub(offset)).collect();
        Ok(Page { items, next })
    }
}

impl Default for MockRemote {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteStore for MockRemote {
    fn name(&self) -> &str {
        &self.name
    }

    async fn list_children(&self, folder: &ItemId, token: Option<&PageToken>) -> Result<Page> {
        let state = self.state.read().await;
        if state.fail_listing.contains(folder) {
            exn::bail!(ErrorKind::Backend(format!("injected listing failure for {folder}")));
        }
        let children: Vec<RemoteItem> = state
            .children
            .get(folder)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .filter_map(|id| state.items.get(id))
            .cloned()
            .collect();
        drop(state);
        self.paginate(children, token)
    }

    async fn folder_name(&self, folder: &ItemId) -> Result<String> {
        let state = self.state.read().await;
        state
            .items
            .get(folder)
            .map(|item| item.name.clone())
            .ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(folder.clone())))
    }

    async fn list_folders(&self, token: Option<&PageToken>) -> Result<Page> {
        let state = self.state.read().await;
        let folders: Vec<RemoteItem> = state
            .order
            .iter()
            .filter_map(|id| state.items.get(id))
            .filter(|item| item.is_folder())
            .cloned()
            .collect();
        drop(state);
        self.paginate(folders, token)
    }

    async fn reparent(&self, file: &ItemId, add_parent: &ItemId, remove_parent: &ItemId) -> Result<()> {
        let mut state = self.state.write().await;
        if state.fail_reparent.contains(file) {
            exn::bail!(ErrorKind::Backend(format!("injected reparent failure for {file}")));
        }
        let item = state.items.get_mut(file).ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(file.clone())))?;
        item.parents.retain(|parent| parent != remove_parent);
        if !item.parents.contains(add_parent) {
            item.parents.push(add_parent.clone());
        }
        // Keep listing membership in step with the reported parents.
        if let Some(siblings) = state.children.get_mut(remove_parent) {
            siblings.retain(|id| id != file);
        }
        let listed = state.children.entry(add_parent.clone()).or_default();
        if !listed.contains(file) {
            listed.push(file.clone());
        }
        Ok(())
    }
}
