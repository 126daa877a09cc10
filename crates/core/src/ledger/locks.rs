//! Per-ledger write serialization.
//!
//! Two writes to the same ledger must not plan against the same snapshot.
//! Each ledger key gets its own async mutex; writes to different ledgers
//! never wait on each other. Locks are process-local.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

use super::types::LedgerKey;

/// Registered mutexes kept before idle ones are dropped.
pub const IDLE_LIMIT: usize = 1024;

/// Registry of per-ledger mutexes.
#[derive(Debug)]
pub struct LedgerLocks {
    locks: DashMap<LedgerKey, Arc<Mutex<()>>>,
    idle_limit: usize,
}

impl Default for LedgerLocks {
    fn default() -> Self {
        Self::with_idle_limit(IDLE_LIMIT)
    }
}

impl LedgerLocks {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry that prunes once it holds more than
    /// `idle_limit` mutexes.
    #[must_use]
    pub fn with_idle_limit(idle_limit: usize) -> Self {
        Self {
            locks: DashMap::new(),
            idle_limit,
        }
    }

    /// Waits for exclusive access to a ledger.
    ///
    /// The guard releases the ledger when dropped.
    pub async fn acquire(&self, key: LedgerKey) -> OwnedMutexGuard<()> {
        // Clone the Arc out so the map shard is not held across the await.
        let lock = Arc::clone(
            self.locks
                .entry(key)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .value(),
        );
        lock.lock_owned().await
    }

    /// Number of ledgers with a registered mutex.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Returns true if no ledger has been locked yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }

    /// Drops mutexes nobody holds or waits on.
    pub fn prune(&self) {
        self.locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    /// Prunes when the registry has grown past its idle limit.
    pub fn prune_if_crowded(&self) {
        if self.locks.len() > self.idle_limit {
            let before = self.locks.len();
            self.prune();
            debug!(before, after = self.locks.len(), "Pruned idle ledger locks");
        }
    }
}
