//! Background synchronization of server-side changes.
//!
//! A single task polls the delta feed for the lifetime of the cache. Each
//! cycle drains the feed page by page, applies the changes, then sleeps for
//! the configured interval. The cursor resumes the feed where the previous
//! cycle left off.

use std::collections::HashMap;
use std::sync::Arc;

use graph_drive::adapter::RemoteAdapter;
use graph_drive::models::{strip_base_url, ItemRecord};
use tracing::{debug, error, info, instrument, trace};

use crate::cache::MetadataCache;
use crate::config::SyncConfig;
use crate::error::CacheError;

/// Whether the current polling cycle should request further pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaOutcome {
    /// More pages follow; poll again immediately.
    Continue,
    /// End of the feed; wait for the next cycle.
    Stop,
}

/// Reduce a page to the last record per id, in page order of those last
/// occurrences. The service may report an item several times within one
/// page and documents the final record as authoritative.
fn dedup_last_wins(records: &[ItemRecord]) -> Vec<&ItemRecord> {
    let mut last_index: HashMap<&str, usize> = HashMap::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        last_index.insert(record.id.as_str(), index);
    }
    let mut keep: Vec<usize> = last_index.into_values().collect();
    keep.sort_unstable();
    keep.into_iter().map(|index| &records[index]).collect()
}

impl<A: RemoteAdapter> MetadataCache<A> {
    /// Poll the delta feed and apply server-side changes, forever.
    ///
    /// Spawn this once after construction; it ends only with the process.
    pub async fn delta_loop(self: Arc<Self>, config: SyncConfig) {
        trace!("starting delta task");
        loop {
            debug!("syncing deltas from the server");
            loop {
                match self.poll_deltas().await {
                    Ok(DeltaOutcome::Continue) => {}
                    Ok(DeltaOutcome::Stop) => break,
                    Err(err) => {
                        error!(error = %err, "could not fetch server deltas");
                        break;
                    }
                }
            }
            debug!("sync complete");
            tokio::time::sleep(config.poll_interval).await;
        }
    }

    /// Fetch and apply one page of the delta feed at the current cursor.
    ///
    /// Advances the cursor to the page's next link, or to its terminal link
    /// when the feed reports the end of this cycle.
    #[instrument(skip(self))]
    pub async fn poll_deltas(&self) -> Result<DeltaOutcome, CacheError> {
        let cursor = self.delta_cursor();
        let page = self.adapter.poll_delta(&cursor).await?;

        for record in dedup_last_wins(&page.value) {
            self.apply_delta(record);
        }

        if let Some(next) = page.next_link.as_deref() {
            self.set_delta_cursor(strip_base_url(next));
            return Ok(DeltaOutcome::Continue);
        }
        if let Some(terminal) = page.delta_link.as_deref() {
            self.set_delta_cursor(strip_base_url(terminal));
        }
        Ok(DeltaOutcome::Stop)
    }

    /// Reconcile one server-side change record with local state.
    fn apply_delta(&self, record: &ItemRecord) {
        debug!(id = %record.id, name = %record.name, "applying delta");

        if self.get_id(record.parent_id()).is_none() {
            // The subtree is unknown locally; the latest copy will be
            // pulled down when it is next accessed.
            trace!(
                name = %record.name,
                parent_id = %record.parent_id(),
                "skipping delta, parent not in cache"
            );
            return;
        }

        if record.is_tombstone() {
            info!(id = %record.id, name = %record.name, "applying server-side deletion");
            self.delete_id(&record.id);
            return;
        }

        // Renames, moves and metadata updates are reconciled lazily on the
        // next fetch of the containing directory.
    }
}
