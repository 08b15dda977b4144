use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use tracing::warn;

/// An outstanding call awaiting its response or its deadline.
#[derive(Debug, Clone)]
pub struct PendingBridgeRequest {
    pub id: String,
    pub method: String,
    pub issued_at: Instant,
}

/// Ids of every call currently in flight on one client.
///
/// Registration draws a fresh id and re-draws while it collides with an
/// outstanding one. The returned guard unregisters on drop, so a timed-out
/// or cancelled call never leaves an entry behind.
#[derive(Clone, Default)]
pub struct PendingTable {
    inner: Arc<Mutex<HashMap<String, PendingBridgeRequest>>>,
}

impl PendingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&self, method: &str, mut next_id: F) -> PendingGuard
    where
        F: FnMut() -> String,
    {
        let mut map = self.lock();
        let mut id = next_id();
        while map.contains_key(&id) {
            warn!(id = %id, method, "correlation id collision, drawing again");
            id = next_id();
        }
        map.insert(
            id.clone(),
            PendingBridgeRequest {
                id: id.clone(),
                method: method.to_string(),
                issued_at: Instant::now(),
            },
        );
        PendingGuard {
            table: self.clone(),
            id,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lock().contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<PendingBridgeRequest> {
        self.lock().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, PendingBridgeRequest>> {
        // a panic while holding the lock cannot leave the map half-updated
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Holds one pending entry; removes it when dropped.
pub struct PendingGuard {
    table: PendingTable,
    id: String,
}

impl PendingGuard {
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.table.lock().remove(&self.id);
    }
}
