//! Expired Entry Sweep Task
//!
//! Background task that periodically removes stale entries so that segments
//! with a max age do not hold results nobody will read again.
//!
//! Without the sweep a stale entry stays in its segment until the next
//! lookup of its key. With it, `size` and `lastAccessed` in [`stats`] can
//! drop between calls even though no memoized call ran. Hit/miss counters
//! and rates are not affected.
//!
//! [`stats`]: crate::cache::CacheStore::stats

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{CacheStore, Clock};

/// Spawns a background task that periodically sweeps expired entries.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between sweeps. Only segments whose memoizer configured a max age are
/// affected, and hit/miss counters are left alone.
///
/// # Arguments
/// * `store` - Shared cache store
/// * `clock` - Time source used to age entries
/// * `sweep_interval_secs` - Interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let store = CacheStore::shared();
/// let sweep_handle = spawn_sweep_task(store.clone(), Arc::new(SystemClock), 1);
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_sweep_task(
    store: Arc<CacheStore>,
    clock: Arc<dyn Clock>,
    sweep_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(sweep_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting expired entry sweep with interval of {} seconds",
            sweep_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = store.sweep_expired(clock.now_ms());

            if removed > 0 {
                info!("Sweep: removed {} expired entries", removed);
            } else {
                debug!("Sweep: no expired entries found");
            }
        }
    })
}
