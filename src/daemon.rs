use std::path::PathBuf;
use std::time::Duration;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::Policy;
use crate::sweep::run_sweep;

/// Drive the sweep loop: one sweep, then a timed idle period, forever.
///
/// Each sweep runs on its own task, so a panic inside it is caught at the
/// join boundary and logged as an ordinary failed cycle; nothing that
/// happens during a sweep can end the loop. The idle period is the only
/// point that observes `cancel` — an in-flight sweep is short-lived and
/// always runs to completion.
pub async fn run(root: PathBuf, policy: Policy, cancel: CancellationToken) {
    info!(
        root = %root.display(),
        interval_secs = policy.interval.as_secs(),
        retention_secs = policy.retention.as_secs(),
        max_storage_mb = policy.max_storage_mb,
        "cleanup service started"
    );

    loop {
        let sweep = tokio::spawn(run_sweep(root.clone(), policy.clone()));
        if let Err(err) = sweep.await {
            error!("sweep aborted unexpectedly: {err}");
        }

        if idle(policy.interval, &cancel).await.is_none() {
            info!("cleanup service stopping");
            return;
        }
    }
}

/// Sleep for `interval`, waking early on cancellation. Returns `None` when
/// the loop should exit.
async fn idle(interval: Duration, cancel: &CancellationToken) -> Option<()> {
    tokio::select! {
        _ = cancel.cancelled() => None,
        _ = sleep(interval) => Some(()),
    }
}
