//! Tunables for background synchronization.

use std::time::Duration;

/// Configuration for the delta synchronization task.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Pause between delta polling cycles once the feed reports its end.
    pub poll_interval: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(30),
        }
    }
}
