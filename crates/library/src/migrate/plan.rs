use crate::migrate::error::{ErrorKind, Result as MigrateResult};
use exn::ResultExt;
use skiff_remote::{ItemId, RemoteItem, RemoteStore, list_all_folders};
use std::collections::{HashMap, HashSet, VecDeque};

/// A validated-by-construction migration request: distinct source folders
/// and exactly one destination, owned by the caller for the duration of
/// the operation (no process-scoped selection state).
#[derive(Debug, Clone)]
pub struct MigrationPlan {
    sources: Vec<ItemId>,
    destination: ItemId,
}

impl MigrationPlan {
    /// Build a plan from the picker's selections.
    ///
    /// Duplicate source selections collapse into one (preserving first-seen
    /// order). Rejected outright: an empty source set, and a destination
    /// that is itself one of the sources. Whether the destination is
    /// *nested inside* a source requires knowledge of the folder tree and
    /// is checked by [`validate`](Self::validate).
    pub fn new(sources: impl IntoIterator<Item = ItemId>, destination: ItemId) -> MigrateResult<Self> {
        let mut seen = HashSet::new();
        let sources: Vec<ItemId> = sources.into_iter().filter(|source| seen.insert(source.clone())).collect();
        if sources.is_empty() {
            exn::bail!(ErrorKind::Plan("no source folders selected".to_string()));
        }
        if sources.contains(&destination) {
            exn::bail!(ErrorKind::Plan(format!("destination {destination} is one of the sources")));
        }
        Ok(Self { sources, destination })
    }

    pub fn sources(&self) -> &[ItemId] {
        &self.sources
    }

    pub fn destination(&self) -> &ItemId {
        &self.destination
    }

    /// Reject a destination nested anywhere inside a source's subtree.
    ///
    /// Pure over the catalog snapshot — no remote calls. Migrating a
    /// folder's files into a folder below it would feed the move loop its
    /// own output.
    pub fn validate(&self, catalog: &FolderCatalog) -> MigrateResult<()> {
        for source in &self.sources {
            if catalog.is_inside(&self.destination, source) {
                exn::bail!(ErrorKind::Plan(format!(
                    "destination {} is nested inside source {source}",
                    self.destination
                )));
            }
        }
        Ok(())
    }
}

/// A snapshot of every folder the credential can see, with parent links.
///
/// Built from the fully-paginated folder listing (the same one that
/// populates folder pickers), and consulted for the pure ancestry checks
/// plan validation needs.
#[derive(Debug, Default)]
pub struct FolderCatalog {
    parents: HashMap<ItemId, Vec<ItemId>>,
}

impl FolderCatalog {
    /// Build a catalog from listed items. Non-folders are ignored.
    pub fn from_items(items: impl IntoIterator<Item = RemoteItem>) -> Self {
        let parents = items
            .into_iter()
            .filter(RemoteItem::is_folder)
            .map(|item| (item.id, item.parents))
            .collect();
        Self { parents }
    }

    /// Fetch the folder listing from the remote store and build a catalog.
    pub async fn fetch(remote: &dyn RemoteStore) -> MigrateResult<Self> {
        let folders = list_all_folders(remote).await.or_raise(|| ErrorKind::Remote)?;
        Ok(Self::from_items(folders))
    }

    /// `true` when `candidate` sits strictly inside `ancestor`'s subtree.
    ///
    /// Ascends parent links breadth-first; folders may report several
    /// parents, and a visited set guards against cycles in a malformed
    /// snapshot.
    pub fn is_inside(&self, candidate: &ItemId, ancestor: &ItemId) -> bool {
        let mut visited = HashSet::new();
        let mut queue: VecDeque<&ItemId> = self.parents.get(candidate).into_iter().flatten().collect();
        while let Some(folder) = queue.pop_front() {
            if folder == ancestor {
                return true;
            }
            if visited.insert(folder) {
                queue.extend(self.parents.get(folder).into_iter().flatten());
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skiff_remote::ItemKind;

    fn folder(id: &str, parents: &[&str]) -> RemoteItem {
        RemoteItem {
            id: ItemId::from(id),
            name: id.to_string(),
            kind: ItemKind::Folder,
            parents: parents.iter().copied().map(ItemId::from).collect(),
            view_link: None,
        }
    }

    /// root > a > b > c, plus a sibling `other`.
    fn catalog() -> FolderCatalog {
        FolderCatalog::from_items([
            folder("root", &[]),
            folder("a", &["root"]),
            folder("b", &["a"]),
            folder("c", &["b"]),
            folder("other", &["root"]),
        ])
    }

    #[test]
    fn rejects_empty_sources() {
        let err = MigrationPlan::new([], ItemId::from("dst")).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Plan(_)));
    }

    #[test]
    fn rejects_destination_equal_to_source() {
        let err = MigrationPlan::new([ItemId::from("a"), ItemId::from("b")], ItemId::from("b")).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Plan(_)));
    }

    #[test]
    fn deduplicates_sources_preserving_order() {
        let plan = MigrationPlan::new(
            [ItemId::from("a"), ItemId::from("b"), ItemId::from("a")],
            ItemId::from("dst"),
        )
        .unwrap();
        assert_eq!(plan.sources(), &[ItemId::from("a"), ItemId::from("b")]);
    }

    #[test]
    fn ancestry_checks() {
        let catalog = catalog();
        assert!(catalog.is_inside(&ItemId::from("c"), &ItemId::from("a")));
        assert!(catalog.is_inside(&ItemId::from("b"), &ItemId::from("root")));
        assert!(!catalog.is_inside(&ItemId::from("a"), &ItemId::from("c")));
        assert!(!catalog.is_inside(&ItemId::from("other"), &ItemId::from("a")));
        // Strict: a folder is not inside itself.
        assert!(!catalog.is_inside(&ItemId::from("a"), &ItemId::from("a")));
    }

    #[test]
    fn ancestry_survives_a_parent_cycle() {
        let catalog = FolderCatalog::from_items([folder("x", &["y"]), folder("y", &["x"])]);
        assert!(!catalog.is_inside(&ItemId::from("x"), &ItemId::from("z")));
        assert!(catalog.is_inside(&ItemId::from("x"), &ItemId::from("y")));
    }

    #[test]
    fn rejects_destination_nested_inside_source() {
        let plan = MigrationPlan::new([ItemId::from("a")], ItemId::from("c")).unwrap();
        let err = plan.validate(&catalog()).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Plan(_)));
    }

    #[test]
    fn accepts_destination_outside_sources() {
        let plan = MigrationPlan::new([ItemId::from("a")], ItemId::from("other")).unwrap();
        plan.validate(&catalog()).unwrap();
    }
}
