/*!
 * Pending results awaiting the final commit.
 *
 * Workers park finished, serialized resource bytes here instead of touching
 * the live resource list. The coordinator drains the cache exactly once after
 * every worker has finished inside the deadline, or discards it wholesale, so
 * a half-done job can never leave the archive in a mixed state.
 */

use std::collections::HashMap;

use log::debug;
use parking_lot::RwLock;

/// Concurrent map from resource identity to finished serialized bytes.
///
/// Workers each own their resource exclusively, so no two of them ever write
/// the same key; the lock only has to make the inserts themselves safe.
pub struct PendingCache {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl PendingCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Park finished bytes for one resource
    pub fn insert(&self, resource_id: &str, bytes: Vec<u8>) {
        debug!(
            "Caching {} serialized bytes for resource '{}'",
            bytes.len(),
            resource_id
        );
        self.entries.write().insert(resource_id.to_string(), bytes);
    }

    /// Whether a finished result is parked for the given resource
    pub fn contains(&self, resource_id: &str) -> bool {
        self.entries.read().contains_key(resource_id)
    }

    /// Number of parked results
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the cache holds no results
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Take every parked result, leaving the cache empty
    pub fn drain(&self) -> HashMap<String, Vec<u8>> {
        std::mem::take(&mut *self.entries.write())
    }

    /// Throw every parked result away
    pub fn discard(&self) {
        let dropped = {
            let mut entries = self.entries.write();
            let count = entries.len();
            entries.clear();
            count
        };
        if dropped > 0 {
            debug!("Discarded {} cached resource results", dropped);
        }
    }
}

impl Default for PendingCache {
    fn default() -> Self {
        Self::new()
    }
}
