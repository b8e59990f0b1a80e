//! The metadata cache: a concurrently accessed item tree addressed by id.

use std::sync::{Arc, Mutex};

use graph_drive::adapter::RemoteAdapter;
use graph_drive::auth::Auth;
use tracing::warn;

use crate::error::CacheError;
use crate::item::DriveItem;
use crate::registry::Registry;

/// Initial delta cursor: skip history, start from the current state.
/// Everything older is pulled down on demand instead.
const DELTA_CURSOR_LATEST: &str = "/drive/root/delta?token=latest";

/// In-memory metadata cache for a remote drive.
///
/// Entries never expire; they live until the process exits, a delta removes
/// them, or a local operation deletes them. The remote service stays the
/// authority; the cache converges on it through the delta feed.
pub struct MetadataCache<A> {
    pub(crate) registry: Registry,
    root_id: String,
    pub(crate) adapter: A,
    auth: Option<Auth>,
    delta_cursor: Mutex<String>,
}

impl<A: RemoteAdapter> MetadataCache<A> {
    /// Fetch the drive root through `adapter` and build a cache around it.
    ///
    /// `auth` gates lazy child fetches; without it, only already-cached
    /// subtrees are reachable.
    pub async fn new(adapter: A, auth: Option<Auth>) -> Result<Self, CacheError> {
        let record = adapter.get_root().await?;
        let root = Arc::new(DriveItem::from_record(&record));
        let cache = Self {
            registry: Registry::new(),
            root_id: record.id.clone(),
            adapter,
            auth,
            delta_cursor: Mutex::new(DELTA_CURSOR_LATEST.to_owned()),
        };
        cache.insert_id(record.id, root);
        Ok(cache)
    }

    /// Id of the tree root, fixed after construction.
    #[must_use]
    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    /// Current delta cursor, relative to the service base URL.
    #[must_use]
    pub fn delta_cursor(&self) -> String {
        self.delta_cursor.lock().expect("cursor lock poisoned").clone()
    }

    pub(crate) fn set_delta_cursor(&self, cursor: &str) {
        *self.delta_cursor.lock().expect("cursor lock poisoned") = cursor.to_owned();
    }

    pub(crate) fn has_credentials(&self) -> bool {
        self.auth.as_ref().is_some_and(Auth::has_token)
    }

    /// Item lookup by id. No remote calls, `None` if unknown.
    #[must_use]
    pub fn get_id(&self, id: &str) -> Option<Arc<DriveItem>> {
        self.registry.get(id)
    }

    /// Register `item` under `id` and link it into its parent's child list.
    ///
    /// Must be called after [`delete_id`](Self::delete_id) when re-homing an
    /// item. A missing parent leaves the item registered but unlinked; the
    /// link is restored when the parent's children are next fetched.
    pub fn insert_id(&self, id: impl Into<String>, item: Arc<DriveItem>) {
        let id = id.into();
        self.registry.store(id.clone(), Arc::clone(&item));

        let parent_id = item.parent_id();
        if parent_id.is_empty() {
            // Root, or parent not set yet.
            return;
        }
        let Some(parent) = self.registry.get(&parent_id) else {
            warn!(
                %parent_id,
                child_id = %id,
                child_name = %item.name(),
                "parent not in registry while linking child"
            );
            return;
        };
        if Arc::ptr_eq(&parent, &item) {
            warn!(id = %id, "item is its own parent, refusing to link");
            return;
        }

        // Lock order: parent, then child.
        let mut parent_state = parent.write();
        if let Some(children) = &parent_state.children
            && children.iter().any(|child| *child == id)
        {
            return;
        }

        let mut state = item.write();
        if item.is_dir() {
            parent_state.subdir_count += 1;
        }
        parent_state
            .children
            .get_or_insert_with(Vec::new)
            .push(id);
        // Keep the two representations of the link consistent.
        state.parent_id = parent_state.id.clone();
    }

    /// Remove `id` from the registry and unlink it from its parent.
    ///
    /// Must be called before [`insert_id`](Self::insert_id) when re-homing
    /// an item. Unknown ids only clear any stale registry entry.
    pub fn delete_id(&self, id: &str) {
        if let Some(item) = self.registry.get(id)
            && let Some(parent) = self.registry.get(&item.parent_id())
        {
            let mut parent_state = parent.write();
            if let Some(children) = parent_state.children.as_mut()
                && let Some(pos) = children.iter().position(|child| child == id)
            {
                children.remove(pos);
                if item.is_dir() {
                    parent_state.subdir_count -= 1;
                }
            }
        }
        self.registry.remove(id);
    }

    /// Re-key an item from `old_id` to `new_id`.
    ///
    /// Unlike delete-and-recreate this preserves the item's position in its
    /// parent's child order and the shared reference itself, so existing
    /// holders keep seeing the same item under its new id.
    pub fn move_id(&self, old_id: &str, new_id: &str) -> Result<(), CacheError> {
        let item = match self.registry.get(old_id) {
            Some(item) => item,
            // The rename may already have happened; ids never collide, so
            // finding the item under the new id is not an error.
            None => self
                .registry
                .get(new_id)
                .ok_or_else(|| CacheError::NotFound(old_id.to_owned()))?,
        };

        if let Some(parent) = self.registry.get(&item.parent_id()) {
            let mut parent_state = parent.write();
            if let Some(children) = parent_state.children.as_mut()
                && let Some(slot) = children.iter_mut().find(|child| child.as_str() == old_id)
            {
                *slot = new_id.to_owned();
            }
        }

        item.write().id = new_id.to_owned();

        self.registry.remove(old_id);
        self.registry.store(new_id.to_owned(), item);
        Ok(())
    }

    /// Best-effort POSIX path of a cached item, for diagnostics. Falls back
    /// to the item's id when the parent chain is broken.
    #[must_use]
    pub fn path_of(&self, item: &DriveItem) -> String {
        if item.id() == self.root_id {
            return "/".to_owned();
        }
        let mut segments = vec![item.name()];
        let mut current = item.parent_id();
        while !current.is_empty() && current != self.root_id {
            let Some(parent) = self.registry.get(&current) else {
                return item.id();
            };
            segments.push(parent.name());
            current = parent.parent_id();
        }
        segments.reverse();
        format!("/{}", segments.join("/"))
    }
}
