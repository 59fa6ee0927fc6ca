//! Cache Maintenance Task
//!
//! Background task that periodically runs the cache engine's pending work so
//! expired entries are purged even when nothing reads them.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::MemoryCache;
use crate::config::MIN_MAINTENANCE_INTERVAL;

/// Spawns a background task that periodically runs cache maintenance.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between runs. Each run applies pending evictions and removes expired
/// entries from the engine.
///
/// # Arguments
/// * `cache` - Handle to the shared memory cache
/// * `interval_secs` - Interval in seconds between maintenance runs, at least 1
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let cache = MemoryCache::new(&MemoryConfig::default())?;
/// let handle = spawn_maintenance_task(cache.clone(), 1);
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_maintenance_task(cache: MemoryCache, interval_secs: u64) -> JoinHandle<()> {
    let interval_secs = interval_secs.max(MIN_MAINTENANCE_INTERVAL);
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting cache maintenance task with interval of {} seconds",
            interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let before = cache.entry_count();
            cache.run_pending_tasks();
            let after = cache.entry_count();

            if before > after {
                info!(
                    removed = before - after,
                    remaining = after,
                    "Cache maintenance purged entries"
                );
            } else {
                debug!(entries = after, "Cache maintenance: nothing to purge");
            }
        }
    })
}
