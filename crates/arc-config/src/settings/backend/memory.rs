use super::{PersistenceBackend, StorageChange, CHANGE_CAPACITY};
use arc_common::SettingsError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::{broadcast, Mutex};

/// In-memory backend for tests and simulations.
///
/// Reads and writes can be made to fail to exercise the store's fallback
/// paths, and [`MemoryBackend::external_write`] stands in for another
/// context editing storage.
pub struct MemoryBackend {
    values: Mutex<HashMap<String, Value>>,
    tx: broadcast::Sender<StorageChange>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANGE_CAPACITY);
        Self {
            values: Mutex::new(HashMap::new()),
            tx,
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn with_value(key: &str, value: Value) -> Self {
        let mut backend = Self::new();
        backend.values.get_mut().insert(key.to_string(), value);
        backend
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful writes made through [`PersistenceBackend::write`].
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub async fn snapshot(&self, key: &str) -> Option<Value> {
        self.values.lock().await.get(key).cloned()
    }

    /// Store a value as if another process had written it.
    pub async fn external_write(&self, key: &str, value: Option<Value>) {
        self.store(key, value).await;
    }

    async fn store(&self, key: &str, value: Option<Value>) {
        let old_value = {
            let mut values = self.values.lock().await;
            match value.clone() {
                Some(v) => values.insert(key.to_string(), v),
                None => values.remove(key),
            }
        };
        let _ = self.tx.send(StorageChange {
            key: key.to_string(),
            old_value,
            new_value: value,
        });
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PersistenceBackend for MemoryBackend {
    async fn read(&self, key: &str) -> Result<Option<Value>, SettingsError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(SettingsError::Persistence("injected read failure".into()));
        }
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn write(&self, key: &str, value: Value) -> Result<(), SettingsError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(SettingsError::Persistence("injected write failure".into()));
        }
        self.store(key, Some(value)).await;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageChange> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn write_then_read() {
        let backend = MemoryBackend::new();
        backend.write("k", json!(1)).await.unwrap();
        assert_eq!(backend.read("k").await.unwrap(), Some(json!(1)));
        assert_eq!(backend.write_count(), 1);
    }

    #[tokio::test]
    async fn writes_are_announced_with_old_value() {
        let backend = MemoryBackend::with_value("k", json!("a"));
        let mut rx = backend.subscribe();
        backend.write("k", json!("b")).await.unwrap();
        let change = rx.recv().await.unwrap();
        assert_eq!(change.key, "k");
        assert_eq!(change.old_value, Some(json!("a")));
        assert_eq!(change.new_value, Some(json!("b")));
    }

    #[tokio::test]
    async fn injected_failures() {
        let backend = MemoryBackend::new();
        backend.set_fail_reads(true);
        assert!(backend.read("k").await.is_err());
        backend.set_fail_writes(true);
        assert!(backend.write("k", json!(1)).await.is_err());
        assert_eq!(backend.write_count(), 0);
    }

    #[tokio::test]
    async fn external_write_can_remove() {
        let backend = MemoryBackend::with_value("k", json!(1));
        backend.external_write("k", None).await;
        assert_eq!(backend.snapshot("k").await, None);
    }
}
