//! Per-key async mutual exclusion.
//!
//! Operations on the same key run one at a time; different keys never wait
//! on each other. Entries are dropped as soon as nobody holds or waits on
//! them, so the map only grows with the number of keys in flight.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Default)]
pub(crate) struct KeyedLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl KeyedLocks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `key`.
    pub(crate) async fn lock(&self, key: &str) -> KeyedGuard<'_> {
        let mutex = Arc::clone(self.locks.entry(key.to_string()).or_default().value());
        // Built before waiting so a cancelled waiter still prunes the entry.
        let mut keyed = KeyedGuard {
            locks: self,
            key: key.to_string(),
            guard: None,
        };
        keyed.guard = Some(mutex.lock_owned().await);
        keyed
    }

    /// Number of keys currently held or awaited.
    pub(crate) fn len(&self) -> usize {
        self.locks.len()
    }
}

/// Exclusive access to one key; released on drop.
///
/// While `guard` is `None` the owner is still waiting.
pub(crate) struct KeyedGuard<'a> {
    locks: &'a KeyedLocks,
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyedGuard<'_> {
    fn drop(&mut self) {
        // Release the mutex first so its Arc count reflects only the map and waiters.
        drop(self.guard.take());
        self.locks
            .locks
            .remove_if(self.key.as_str(), |_, mutex| Arc::strong_count(mutex) == 1);
    }
}
