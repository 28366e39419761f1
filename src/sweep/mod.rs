use std::path::PathBuf;
use std::time::SystemTime;

use tracing::info;

use crate::config::Policy;

pub mod capacity;
pub mod retention;
pub mod sessions;
pub mod usage;

/// Counts produced by one sweep. Not persisted anywhere, only logged and
/// returned to the caller.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepResult {
    /// Sessions removed because they outlived the retention ceiling.
    pub expired: usize,
    /// Sessions evicted to bring storage back under the proactive threshold.
    pub capacity_evicted: usize,
}

impl SweepResult {
    pub fn total(&self) -> usize {
        self.expired + self.capacity_evicted
    }
}

/// Run one full sweep of the upload root.
///
/// Retention runs first so stale data is purged before the capacity pass
/// measures usage and decides whether further eviction is needed. Both
/// strategies walk the same oldest-first session list. The summary line is
/// only emitted when something was actually deleted.
pub async fn run_sweep(root: PathBuf, policy: Policy) -> SweepResult {
    info!(root = %root.display(), "sweep started");

    let sessions = sessions::list_sessions(&root).await;
    let now = SystemTime::now();

    let expired = retention::remove_expired(&sessions, now, policy.retention).await;
    let capacity_evicted =
        capacity::evict_to_threshold(&root, &sessions, policy.proactive_bytes()).await;

    let result = SweepResult {
        expired,
        capacity_evicted,
    };
    if result.total() > 0 {
        info!(
            expired = result.expired,
            capacity_evicted = result.capacity_evicted,
            "sweep complete"
        );
    }
    result
}
