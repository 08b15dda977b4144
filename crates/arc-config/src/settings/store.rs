use super::backend::{PersistenceBackend, CHANGE_CAPACITY};
use super::types::{Settings, SettingsDefaults, STORAGE_KEY};
use arc_common::SettingsError;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Process-wide settings with a single in-memory cache in front of a
/// persistence backend.
///
/// Every cache replacement bumps [`version`](Self::version) and is
/// published to [`subscribe`](Self::subscribe) receivers. Concurrent
/// updates are serialized; the last write wins.
///
/// While [`watch_backend`](Self::watch_backend) runs, the backend's echoes
/// of this store's own writes are recognized and skipped, so only changes
/// made elsewhere replace the cache.
pub struct SettingsStore {
    backend: Arc<dyn PersistenceBackend>,
    defaults: SettingsDefaults,
    cache: RwLock<Option<Arc<Settings>>>,
    version: AtomicU64,
    tx: watch::Sender<Settings>,
    update_lock: Mutex<()>,
    watching: AtomicBool,
    /// Documents written by this store whose change event has not come back yet.
    own_writes: std::sync::Mutex<VecDeque<Value>>,
}

impl SettingsStore {
    pub fn new(backend: Arc<dyn PersistenceBackend>, defaults: SettingsDefaults) -> Self {
        let (tx, _) = watch::channel(defaults.settings());
        Self {
            backend,
            defaults,
            cache: RwLock::new(None),
            version: AtomicU64::new(0),
            tx,
            update_lock: Mutex::new(()),
            watching: AtomicBool::new(false),
            own_writes: std::sync::Mutex::new(VecDeque::new()),
        }
    }

    pub fn defaults(&self) -> &SettingsDefaults {
        &self.defaults
    }

    /// Current settings. Never fails.
    ///
    /// A cold cache is filled from the backend, and the merged document is
    /// written back when nothing was stored yet. Backend read errors are
    /// logged and the defaults returned without caching them, so a later
    /// call retries.
    pub async fn get(&self) -> Settings {
        if let Some(cached) = self.cache.read().await.as_ref() {
            return Settings::clone(cached);
        }

        let raw = match self.backend.read(STORAGE_KEY).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "settings read failed, using defaults");
                return self.defaults.settings();
            }
        };

        let merged = self.defaults.merge(raw.as_ref());
        if raw.is_none() {
            info!("no stored settings, persisting defaults");
            if let Err(e) = self.write_own(merged.to_value()).await {
                warn!(error = %e, "failed to persist default settings");
            }
        }

        // Another task may have filled the cache while we awaited.
        let mut cache = self.cache.write().await;
        if let Some(cached) = cache.as_ref() {
            return Settings::clone(cached);
        }
        *cache = Some(Arc::new(merged.clone()));
        drop(cache);
        self.publish(merged.clone());
        merged
    }

    /// Apply `transform` to the current settings, re-merge, cache and
    /// persist.
    ///
    /// The cache is replaced *before* the backend write. If the write fails
    /// the error is logged and returned, but the new value stays in effect
    /// for this process (and its subscribers) until the next update or
    /// external change; storage keeps the previous document.
    pub async fn update<F>(&self, transform: F) -> Result<Settings, SettingsError>
    where
        F: FnOnce(Settings) -> Settings,
    {
        let _guard = self.update_lock.lock().await;
        let current = self.get().await;
        let next = self.defaults.fill(transform(current));

        self.replace_cache(next.clone()).await;

        self.write_own(next.to_value())
            .await
            .map_err(|e| {
                warn!(error = %e, "failed to persist settings update");
                e
            })?;
        Ok(next)
    }

    pub async fn set_arc_mode(&self, enabled: bool) -> Result<Settings, SettingsError> {
        self.update(|mut s| {
            s.arc_mode_enabled = enabled;
            s
        })
        .await
    }

    pub async fn set_feature(
        &self,
        shortcut_id: &str,
        enabled: bool,
    ) -> Result<Settings, SettingsError> {
        self.update(|mut s| {
            s.per_shortcut_enabled
                .insert(shortcut_id.to_string(), enabled);
            s
        })
        .await
    }

    /// Adopt a document written by someone else.
    pub async fn on_external_change(&self, new_raw: Option<&Value>) -> Settings {
        let merged = self.defaults.merge(new_raw);
        self.replace_cache(merged.clone()).await;
        merged
    }

    pub fn subscribe(&self) -> watch::Receiver<Settings> {
        self.tx.subscribe()
    }

    /// Number of cache replacements so far.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    /// Pipe backend change events for the settings key into
    /// [`on_external_change`](Self::on_external_change), skipping echoes of
    /// this store's own writes.
    pub fn watch_backend(self: &Arc<Self>) -> JoinHandle<()> {
        let store = Arc::clone(self);
        let mut rx = self.backend.subscribe();
        self.watching.store(true, Ordering::SeqCst);
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(change) if change.key == STORAGE_KEY => {
                        // No update is mid-write while this is held, so every
                        // own write that can echo has been recorded.
                        let _guard = store.update_lock.lock().await;
                        let is_echo = change
                            .new_value
                            .as_ref()
                            .is_some_and(|value| store.take_own_echo(value));
                        if is_echo {
                            continue;
                        }
                        debug!(version = store.version(), "settings changed in storage");
                        store.on_external_change(change.new_value.as_ref()).await;
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!("settings change stream lagged by {n} events, resyncing");
                        let _guard = store.update_lock.lock().await;
                        match store.backend.read(STORAGE_KEY).await {
                            Ok(raw) => {
                                store.on_external_change(raw.as_ref()).await;
                            }
                            Err(e) => warn!(error = %e, "settings resync failed"),
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    async fn write_own(&self, value: Value) -> Result<(), SettingsError> {
        let watching = self.watching.load(Ordering::SeqCst);
        if watching {
            let mut own = self.own_writes();
            own.push_back(value.clone());
            while own.len() > 2 * CHANGE_CAPACITY {
                own.pop_front();
            }
        }
        let result = self.backend.write(STORAGE_KEY, value.clone()).await;
        if result.is_err() && watching {
            let mut own = self.own_writes();
            if let Some(pos) = own.iter().rposition(|v| *v == value) {
                own.remove(pos);
            }
        }
        result
    }

    /// True when `value` is an echo of a recorded own write. Older records
    /// are dropped with it, since their events were lost or already passed.
    fn take_own_echo(&self, value: &Value) -> bool {
        let mut own = self.own_writes();
        match own.iter().position(|v| v == value) {
            Some(pos) => {
                own.drain(..=pos);
                true
            }
            None => false,
        }
    }

    fn own_writes(&self) -> std::sync::MutexGuard<'_, VecDeque<Value>> {
        self.own_writes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn replace_cache(&self, settings: Settings) {
        *self.cache.write().await = Some(Arc::new(settings.clone()));
        self.publish(settings);
    }

    fn publish(&self, settings: Settings) {
        self.version.fetch_add(1, Ordering::SeqCst);
        self.tx.send_replace(settings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::backend::MemoryBackend;
    use serde_json::json;

    const IDS: [&str; 5] = ["new-tab", "close-tab", "reload", "zoom-in", "find"];

    fn store_with(backend: Arc<MemoryBackend>) -> SettingsStore {
        SettingsStore::new(backend, SettingsDefaults::new(IDS))
    }

    #[tokio::test]
    async fn cold_get_persists_defaults() {
        let backend = Arc::new(MemoryBackend::new());
        let store = store_with(backend.clone());

        let settings = store.get().await;
        assert!(!settings.arc_mode_enabled);
        assert_eq!(settings.per_shortcut_enabled.len(), 5);
        assert_eq!(backend.snapshot(STORAGE_KEY).await, Some(settings.to_value()));
        assert_eq!(store.version(), 1);
    }

    #[tokio::test]
    async fn stored_empty_document_enables_every_shortcut() {
        let backend = Arc::new(MemoryBackend::with_value(STORAGE_KEY, json!({})));
        let store = store_with(backend.clone());

        let settings = store.get().await;
        assert!(IDS.iter().all(|id| settings.is_enabled(id)));
        // something was stored, so nothing is written back
        assert_eq!(backend.write_count(), 0);
    }

    #[tokio::test]
    async fn get_is_cached() {
        let backend = Arc::new(MemoryBackend::new());
        let store = store_with(backend.clone());
        store.get().await;
        backend.set_fail_reads(true);
        let again = store.get().await;
        assert_eq!(again.per_shortcut_enabled.len(), 5);
        assert_eq!(store.version(), 1);
    }

    #[tokio::test]
    async fn get_never_fails_on_backend_error() {
        let backend = Arc::new(MemoryBackend::new());
        backend.set_fail_reads(true);
        let store = store_with(backend.clone());

        let settings = store.get().await;
        assert_eq!(settings, store.defaults().settings());
        assert_eq!(store.version(), 0);

        // defaults were not cached; the next read goes to the backend
        backend.set_fail_reads(false);
        backend
            .external_write(STORAGE_KEY, Some(json!({ "arcMode": true })))
            .await;
        assert!(store.get().await.arc_mode_enabled);
    }

    #[tokio::test]
    async fn update_persists_and_bumps_version() {
        let backend = Arc::new(MemoryBackend::new());
        let store = store_with(backend.clone());

        let updated = store.set_feature("reload", false).await.unwrap();
        assert!(!updated.is_enabled("reload"));
        assert!(!store.get().await.is_enabled("reload"));

        let stored = backend.snapshot(STORAGE_KEY).await.unwrap();
        assert_eq!(stored["features"]["reload"], json!(false));
        assert_eq!(store.version(), 2);
    }

    #[tokio::test]
    async fn update_reports_write_failure_but_keeps_cache() {
        let backend = Arc::new(MemoryBackend::new());
        let store = store_with(backend.clone());
        store.get().await;

        backend.set_fail_writes(true);
        let result = store.set_arc_mode(true).await;
        assert!(matches!(result, Err(SettingsError::Persistence(_))));
        assert!(store.get().await.arc_mode_enabled);
    }

    #[tokio::test]
    async fn external_change_replaces_cache() {
        let backend = Arc::new(MemoryBackend::new());
        let store = store_with(backend);
        store.get().await;

        let merged = store
            .on_external_change(Some(&json!({ "arcMode": true, "features": { "find": false } })))
            .await;
        assert!(merged.arc_mode_enabled);
        assert!(!store.get().await.is_enabled("find"));
        assert!(store.get().await.is_enabled("reload"));
    }

    #[tokio::test]
    async fn external_removal_falls_back_to_defaults() {
        let store = store_with(Arc::new(MemoryBackend::new()));
        store.set_arc_mode(true).await.unwrap();
        let merged = store.on_external_change(None).await;
        assert_eq!(merged, store.defaults().settings());
    }

    #[tokio::test]
    async fn subscribers_see_updates() {
        let store = store_with(Arc::new(MemoryBackend::new()));
        let mut rx = store.subscribe();
        store.set_arc_mode(true).await.unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().arc_mode_enabled);
    }

    #[tokio::test]
    async fn watch_backend_follows_external_writes() {
        let backend = Arc::new(MemoryBackend::new());
        let store = Arc::new(store_with(backend.clone()));
        store.get().await;
        let mut rx = store.subscribe();
        let handle = store.watch_backend();

        backend
            .external_write(STORAGE_KEY, Some(json!({ "arcMode": true })))
            .await;
        rx.changed().await.unwrap();
        assert!(store.get().await.arc_mode_enabled);

        // other keys are ignored
        backend.external_write("unrelated", Some(json!(1))).await;
        assert!(store.get().await.arc_mode_enabled);
        handle.abort();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_updates_survive_a_running_watcher() {
        let ids: Vec<String> = (0..60).map(|i| format!("s{i}")).collect();
        let backend = Arc::new(MemoryBackend::new());
        let store = Arc::new(SettingsStore::new(
            backend.clone(),
            SettingsDefaults::new(ids.clone()),
        ));
        store.get().await;
        let watcher = store.watch_backend();

        let mut tasks = Vec::new();
        for id in ids.clone() {
            let store = Arc::clone(&store);
            tasks.push(tokio::spawn(async move {
                store.set_feature(&id, false).await.unwrap();
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }
        // let the watcher work through every echo
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;

        let settings = store.get().await;
        let lost: Vec<&String> = ids.iter().filter(|id| settings.is_enabled(id)).collect();
        assert!(lost.is_empty(), "lost updates: {lost:?}");
        let stored = backend.snapshot(STORAGE_KEY).await.unwrap();
        assert_eq!(stored, settings.to_value());
        watcher.abort();
    }

    #[tokio::test]
    async fn own_write_echo_does_not_bump_version() {
        let backend = Arc::new(MemoryBackend::new());
        let store = Arc::new(store_with(backend.clone()));
        store.get().await;
        let watcher = store.watch_backend();

        store.set_arc_mode(true).await.unwrap();
        let after_update = store.version();
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
        assert_eq!(store.version(), after_update);

        // a genuine external edit still lands
        let mut rx = store.subscribe();
        backend
            .external_write(STORAGE_KEY, Some(json!({ "arcMode": false })))
            .await;
        rx.changed().await.unwrap();
        assert!(!store.get().await.arc_mode_enabled);
        watcher.abort();
    }

    #[tokio::test]
    async fn failed_write_is_not_mistaken_for_an_echo() {
        let backend = Arc::new(MemoryBackend::new());
        let store = Arc::new(store_with(backend.clone()));
        store.get().await;
        let watcher = store.watch_backend();

        backend.set_fail_writes(true);
        assert!(store.set_arc_mode(true).await.is_err());
        backend.set_fail_writes(false);

        // another context writes the very document the failed update tried to store
        let mut rx = store.subscribe();
        let document = store.get().await.to_value();
        store.on_external_change(None).await;
        rx.borrow_and_update();
        backend.external_write(STORAGE_KEY, Some(document)).await;
        rx.changed().await.unwrap();
        assert!(store.get().await.arc_mode_enabled);
        watcher.abort();
    }

    #[tokio::test]
    async fn concurrent_updates_all_land() {
        let store = Arc::new(store_with(Arc::new(MemoryBackend::new())));
        let mut tasks = Vec::new();
        for id in IDS {
            let store = Arc::clone(&store);
            tasks.push(tokio::spawn(async move {
                store.set_feature(id, false).await.unwrap();
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }
        let settings = store.get().await;
        assert!(IDS.iter().all(|id| !settings.is_enabled(id)));
    }
}
