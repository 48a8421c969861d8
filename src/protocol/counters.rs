//! Per-client request counters shared across connections.

use std::sync::Arc;

use dashmap::DashMap;

/// A thread-safe map of client address to successful CALCULO count.
///
/// Cloning is cheap and every clone observes the same counters.
#[derive(Debug, Clone, Default)]
pub struct ClientCounters {
    inner: Arc<DashMap<String, u64>>,
}

impl ClientCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the counter for `client`, inserting it at 1 on first use.
    ///
    /// The shard lock is held across the read and write, so concurrent
    /// increments for the same client are never lost.
    pub fn increment(&self, client: &str) -> u64 {
        let mut entry = self.inner.entry(client.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    /// Current count for `client`, if it has made any successful request.
    pub fn get(&self, client: &str) -> Option<u64> {
        self.inner.get(client).map(|count| *count)
    }

    /// Number of distinct clients tracked.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
