//! Keyed async critical sections.
//!
//! All mutating transitions on a single order must be mutually exclusive,
//! while operations on different orders proceed in parallel. The same
//! mechanism serializes concurrent order creations for one (user, course)
//! pair around the duplicate-purchase check.
//!
//! Lock entries are pruned once nobody holds them, so the map does not
//! grow with the number of keys ever seen.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// A map of async mutexes, one per key.
///
/// `acquire` returns an owned guard; the critical section lasts until the
/// guard is dropped. Acquiring different keys never contends beyond the
/// brief registry access.
pub struct KeyedLocks<K> {
    registry: Mutex<HashMap<K, Arc<Mutex<()>>>>,
}

impl<K> KeyedLocks<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty lock map.
    pub fn new() -> Self {
        Self {
            registry: Mutex::new(HashMap::new()),
        }
    }

    /// Acquires the critical section for `key`, waiting if another task
    /// holds it.
    pub async fn acquire(&self, key: K) -> OwnedMutexGuard<()> {
        let entry = {
            let mut registry = self.registry.lock().await;

            // Drop entries nobody holds anymore; a held lock is referenced
            // by at least one guard besides the registry.
            registry.retain(|_, lock| Arc::strong_count(lock) > 1);

            registry
                .entry(key)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };

        entry.lock_owned().await
    }
}

impl<K> Default for KeyedLocks<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
