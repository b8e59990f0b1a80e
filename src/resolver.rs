//! Path resolution and on-demand child population.
//!
//! Paths are compared case-insensitively; the case the server returned is
//! preserved in each item's name for display.

use std::collections::HashMap;
use std::sync::Arc;

use graph_drive::adapter::RemoteAdapter;
use tracing::{error, instrument, warn};

use crate::cache::MetadataCache;
use crate::error::CacheError;
use crate::item::DriveItem;

/// Directory listing keyed by lowercased child name.
pub type ChildMap = HashMap<String, Arc<DriveItem>>;

/// Parent directory of a slash-separated path; `/` is its own parent.
fn parent_dir(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(0) | None => "/",
        Some(pos) => &trimmed[..pos],
    }
}

/// Final segment of a slash-separated path.
fn base_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(pos) => &trimmed[pos + 1..],
        None => trimmed,
    }
}

impl<A: RemoteAdapter> MetadataCache<A> {
    /// Resolve a POSIX path to an item, fetching missing directories from
    /// the remote service along the way.
    #[instrument(skip(self))]
    pub async fn get(&self, path: &str) -> Result<Arc<DriveItem>, CacheError> {
        if path == "/" {
            return self
                .get_id(self.root_id())
                .ok_or_else(|| CacheError::NotFound("/".to_owned()));
        }

        let normalized = path.to_lowercase();
        let normalized = normalized.trim_end_matches('/');
        let segments: Vec<&str> = normalized.split('/').skip(1).collect();

        // Walk the chain of items from the root down to the target.
        let mut current_id = self.root_id().to_owned();
        let mut item = None;
        for (depth, segment) in segments.iter().enumerate() {
            let children = self.get_children_id(&current_id).await?;
            match children.get(*segment) {
                Some(child) => {
                    current_id = child.id();
                    item = Some(Arc::clone(child));
                }
                None => {
                    return Err(CacheError::NotFound(segments[..=depth].join("/")));
                }
            }
        }
        item.ok_or_else(|| CacheError::NotFound(path.to_owned()))
    }

    /// Children of the item with the given id, fetched from the remote
    /// service if the directory has not been populated yet.
    ///
    /// Non-directories resolve to an empty listing so traversal never
    /// trips over them.
    #[instrument(skip(self))]
    pub async fn get_children_id(&self, id: &str) -> Result<ChildMap, CacheError> {
        let Some(item) = self.get_id(id) else {
            return Err(CacheError::NotFound(id.to_owned()));
        };
        if !item.is_dir() {
            warn!(id, path = %self.path_of(&item), "asked for children of a non-directory");
            return Ok(ChildMap::new());
        }

        // Once populated, the child list is served locally; the transition
        // from unpopulated to populated is a one-way commit.
        if let Some(child_ids) = item.children() {
            return Ok(self.children_from_ids(&child_ids));
        }

        if !self.has_credentials() {
            return Err(CacheError::AuthRequired(self.path_of(&item)));
        }

        let page = self.adapter.get_children(id).await?;
        {
            let mut state = item.write();
            // A concurrent fetch may have populated the list while ours was
            // in flight; the first commit wins.
            if state.children.is_none() {
                let mut child_ids = Vec::with_capacity(page.value.len());
                let mut subdirs = 0;
                for record in &page.value {
                    let child = Arc::new(DriveItem::from_record(record));
                    self.registry.store(record.id.clone(), child);
                    if record.is_dir() {
                        subdirs += 1;
                    }
                    child_ids.push(record.id.clone());
                }
                state.children = Some(child_ids);
                state.subdir_count += subdirs;
            }
        }

        let child_ids = item.children().unwrap_or_default();
        Ok(self.children_from_ids(&child_ids))
    }

    /// Children of the item at `path`; composition of
    /// [`get`](Self::get) and [`get_children_id`](Self::get_children_id).
    #[instrument(skip(self))]
    pub async fn get_children_path(&self, path: &str) -> Result<ChildMap, CacheError> {
        let item = self.get(path).await?;
        let id = item.id();
        self.get_children_id(&id).await
    }

    /// Delete the item at `path` from the cache, if present.
    ///
    /// Must be called before [`insert`](Self::insert) when moving or
    /// renaming an item.
    #[instrument(skip(self))]
    pub async fn delete(&self, path: &str) {
        if let Ok(item) = self.get(path).await {
            self.delete_id(&item.id());
        }
    }

    /// Insert a locally created item at `path`.
    ///
    /// Resolves the parent directory (remote calls permitted), rewrites the
    /// item's parent link, and registers it. Fails without modifying state
    /// when the parent cannot be resolved. Must be called after
    /// [`delete`](Self::delete) when moving or renaming an item.
    #[instrument(skip(self, item))]
    pub async fn insert(&self, path: &str, item: Arc<DriveItem>) -> Result<(), CacheError> {
        let parent = self.get(parent_dir(path)).await?;
        if !parent.is_dir() {
            return Err(CacheError::Structural(format!(
                "parent of {path} is not a directory"
            )));
        }

        // Same lock order as the id-level insert: parent ids are read
        // first, then the child is locked alone.
        let parent_id = parent.id();
        item.write().parent_id = parent_id;

        self.insert_id(item.id(), item);
        Ok(())
    }

    /// Move or rename the item at `old_path` to `new_path`.
    ///
    /// On a failed insert the item is re-homed at its old location
    /// best-effort; if even that fails it stays registered but unlinked.
    #[instrument(skip(self))]
    pub async fn move_path(&self, old_path: &str, new_path: &str) -> Result<(), CacheError> {
        let item = self.get(old_path).await?;

        self.delete(old_path).await;
        let old_base = base_name(old_path);
        let new_base = base_name(new_path);
        if old_base != new_base {
            item.set_name(new_base);
        }
        if let Err(err) = self.insert(new_path, Arc::clone(&item)).await {
            item.set_name(old_base);
            if let Err(rollback) = self.insert(old_path, item).await {
                error!(
                    old_path,
                    error = %rollback,
                    "rollback after failed move left an orphaned item"
                );
            }
            return Err(err);
        }
        Ok(())
    }

    /// Build a listing from already-registered child ids, skipping ids
    /// whose item has since been removed.
    fn children_from_ids(&self, child_ids: &[String]) -> ChildMap {
        let mut children = ChildMap::with_capacity(child_ids.len());
        for child_id in child_ids {
            if let Some(child) = self.get_id(child_id) {
                children.insert(child.name().to_lowercase(), child);
            }
        }
        children
    }
}
