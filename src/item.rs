//! Tree node representing one remote object.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use graph_drive::models::ItemRecord;

/// Prefix of ids assigned locally before the server responds with its
/// canonical id for a freshly created item.
pub const LOCAL_ID_PREFIX: &str = "local-";

/// Mutable fields of a [`DriveItem`], guarded by the item's lock.
#[derive(Debug)]
pub(crate) struct ItemState {
    pub(crate) id: String,
    pub(crate) name: String,
    /// Id of the containing item; empty only for the root.
    pub(crate) parent_id: String,
    /// Child ids in server order. `None` means the children have never been
    /// fetched; distinct from a known-empty directory.
    pub(crate) children: Option<Vec<String>>,
    /// Count of the ids in `children` that resolve to directories.
    pub(crate) subdir_count: u32,
}

/// In-memory node of the drive tree.
///
/// Items are shared as `Arc<DriveItem>`: the registry holds the
/// authoritative reference and parents refer to children by id only, so the
/// tree never forms ownership cycles. All mutable fields live behind a
/// single reader/writer lock; when a parent and child are locked by the same
/// operation the parent's lock is always taken first.
#[derive(Debug)]
pub struct DriveItem {
    dir: bool,
    tombstone: bool,
    state: RwLock<ItemState>,
}

impl DriveItem {
    /// Create an item, typically for something created locally before the
    /// server has seen it.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        parent_id: impl Into<String>,
        dir: bool,
    ) -> Self {
        Self {
            dir,
            tombstone: false,
            state: RwLock::new(ItemState {
                id: id.into(),
                name: name.into(),
                parent_id: parent_id.into(),
                children: None,
                subdir_count: 0,
            }),
        }
    }

    /// Build an item from a record returned by the remote service.
    pub fn from_record(record: &ItemRecord) -> Self {
        Self {
            dir: record.is_dir(),
            tombstone: record.is_tombstone(),
            state: RwLock::new(ItemState {
                id: record.id.clone(),
                name: record.name.clone(),
                parent_id: record.parent_id().to_owned(),
                children: None,
                subdir_count: 0,
            }),
        }
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, ItemState> {
        self.state.read().expect("item lock poisoned")
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, ItemState> {
        self.state.write().expect("item lock poisoned")
    }

    /// Current id of the item. May change when the server assigns a
    /// canonical id to a locally created item.
    #[must_use]
    pub fn id(&self) -> String {
        self.read().id.clone()
    }

    /// Human-visible basename, case preserved.
    #[must_use]
    pub fn name(&self) -> String {
        self.read().name.clone()
    }

    /// Rename the item itself; tree structure is untouched.
    pub fn set_name(&self, name: &str) {
        self.write().name = name.to_owned();
    }

    /// Id of the containing item, empty for the root.
    #[must_use]
    pub fn parent_id(&self) -> String {
        self.read().parent_id.clone()
    }

    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.dir
    }

    /// Whether the item was built from a tombstone record.
    #[must_use]
    pub fn is_tombstone(&self) -> bool {
        self.tombstone
    }

    /// Whether the id is a provisional local one the server has not yet
    /// replaced.
    #[must_use]
    pub fn has_local_id(&self) -> bool {
        self.read().id.starts_with(LOCAL_ID_PREFIX)
    }

    /// Snapshot of the child id list; `None` while the children have never
    /// been fetched.
    #[must_use]
    pub fn children(&self) -> Option<Vec<String>> {
        self.read().children.clone()
    }

    /// Number of directory children currently linked under this item.
    #[must_use]
    pub fn subdir_count(&self) -> u32 {
        self.read().subdir_count
    }
}
