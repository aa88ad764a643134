//! Domain models for the remote store.

use derive_more::Display;

/// Opaque identifier of a remote item, unique within the remote system.
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}
impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Opaque continuation cursor returned by a paginated listing call.
///
/// Only meaningful to the backend that produced it; callers hand it back
/// verbatim to fetch the next page.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub struct PageToken(String);

impl PageToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Whether a remote item can hold other items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    /// A container that may hold other items.
    Folder,
    /// A leaf item with no children.
    File,
}

/// A snapshot of one remote item as reported by a listing call.
///
/// Immutable once fetched: mutations on the remote side are only observable
/// by listing again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteItem {
    pub id: ItemId,
    pub name: String,
    pub kind: ItemKind,
    /// Parent container ids. A leaf may report zero or more parents.
    pub parents: Vec<ItemId>,
    /// Browser-viewable link, when the remote system provides one.
    pub view_link: Option<String>,
}

impl RemoteItem {
    pub fn is_folder(&self) -> bool {
        self.kind == ItemKind::Folder
    }
}

/// One page of a paginated listing.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub items: Vec<RemoteItem>,
    /// Absent on the final page.
    pub next: Option<PageToken>,
}
