//! Process-wide id to item mapping.

use std::sync::Arc;

use scc::HashMap as ConcurrentHashMap;

use crate::item::DriveItem;

/// Concurrent mapping from server-assigned id to the shared item.
///
/// Backed by [`scc::HashMap`] (sharded lock-free map), so lookups and
/// updates never contend on a single lock. The registry is the only place
/// items are indexed by id; it makes no judgments about tree shape.
/// Parent/child link maintenance lives in
/// [`MetadataCache`](crate::cache::MetadataCache).
#[derive(Default)]
pub struct Registry {
    map: ConcurrentHashMap<String, Arc<DriveItem>>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an item by id. Never performs remote calls.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<DriveItem>> {
        self.map.read_sync(id, |_, item| Arc::clone(item))
    }

    /// Insert or overwrite the mapping for `id`; last writer wins.
    pub fn store(&self, id: String, item: Arc<DriveItem>) {
        self.map.upsert_sync(id, item);
    }

    /// Delete the mapping for `id`. Does not touch parent linkage.
    pub fn remove(&self, id: &str) {
        self.map.remove_sync(id);
    }

    /// Number of registered items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
