use super::{PersistenceBackend, StorageChange, CHANGE_CAPACITY};
use crate::watcher::FileWatcher;
use arc_common::SettingsError;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

type Document = Map<String, Value>;

/// A JSON document on disk holding one entry per storage key.
///
/// Writes go to a sibling `.tmp` file and are renamed into place. The
/// last-known document is kept so a reload only announces keys whose
/// value actually differs.
pub struct FileBackend {
    path: PathBuf,
    known: Mutex<Document>,
    tx: broadcast::Sender<StorageChange>,
}

impl FileBackend {
    pub async fn open(path: PathBuf) -> Result<Self, SettingsError> {
        let known = load_document(&path).await?;
        let (tx, _) = broadcast::channel(CHANGE_CAPACITY);
        info!(path = %path.display(), keys = known.len(), "opened settings file");
        Ok(Self {
            path,
            known: Mutex::new(known),
            tx,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the file and announce every key that changed since the last
    /// read or write. Returns the number of changes announced.
    pub async fn reload(&self) -> Result<usize, SettingsError> {
        let mut known = self.known.lock().await;
        let fresh = load_document(&self.path).await?;

        let mut changes = Vec::new();
        for (key, new_value) in &fresh {
            if known.get(key) != Some(new_value) {
                changes.push(StorageChange {
                    key: key.clone(),
                    old_value: known.get(key).cloned(),
                    new_value: Some(new_value.clone()),
                });
            }
        }
        for (key, old_value) in known.iter() {
            if !fresh.contains_key(key) {
                changes.push(StorageChange {
                    key: key.clone(),
                    old_value: Some(old_value.clone()),
                    new_value: None,
                });
            }
        }

        *known = fresh;
        drop(known);

        let count = changes.len();
        for change in changes {
            debug!(key = %change.key, "settings file changed externally");
            let _ = self.tx.send(change);
        }
        Ok(count)
    }

    /// Watch the file and [`reload`](Self::reload) after each debounced
    /// change. Abort the returned handle to stop watching.
    pub fn spawn_watcher(self: &Arc<Self>, debounce: Duration) -> JoinHandle<()> {
        let backend = Arc::clone(self);
        tokio::spawn(async move {
            let watcher = match FileWatcher::new(backend.path.clone()) {
                Ok(w) => w.with_debounce(debounce),
                Err(e) => {
                    error!("failed to create settings watcher: {e}");
                    return;
                }
            };

            let (change_tx, mut change_rx) = broadcast::channel::<()>(16);
            tokio::spawn(async move {
                if let Err(e) = watcher.watch(change_tx).await {
                    error!("settings watcher error: {e}");
                }
            });

            loop {
                match change_rx.recv().await {
                    Ok(()) => {
                        if let Err(e) = backend.reload().await {
                            warn!(path = %backend.path.display(), "settings reload failed: {e}");
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!("settings watcher lagged by {n} events");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    async fn persist(&self, doc: &Document) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    SettingsError::Persistence(format!(
                        "failed to create {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        let body = serde_json::to_string_pretty(doc)
            .map_err(|e| SettingsError::Serialization(e.to_string()))?;
        let tmp = tmp_path(&self.path);
        tokio::fs::write(&tmp, body).await.map_err(|e| {
            SettingsError::Persistence(format!("failed to write {}: {e}", tmp.display()))
        })?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            SettingsError::Persistence(format!(
                "failed to move {} into place: {e}",
                tmp.display()
            ))
        })
    }
}

#[async_trait]
impl PersistenceBackend for FileBackend {
    async fn read(&self, key: &str) -> Result<Option<Value>, SettingsError> {
        let doc = load_document(&self.path).await?;
        Ok(doc.get(key).cloned())
    }

    async fn write(&self, key: &str, value: Value) -> Result<(), SettingsError> {
        let mut known = self.known.lock().await;
        let mut doc = match load_document(&self.path).await {
            Ok(doc) => doc,
            Err(e) => {
                warn!(path = %self.path.display(), "rewriting unreadable settings file: {e}");
                known.clone()
            }
        };

        let old_value = doc.insert(key.to_string(), value.clone());
        self.persist(&doc).await?;
        *known = doc;
        drop(known);

        let _ = self.tx.send(StorageChange {
            key: key.to_string(),
            old_value,
            new_value: Some(value),
        });
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageChange> {
        self.tx.subscribe()
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

async fn load_document(path: &Path) -> Result<Document, SettingsError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Document::new()),
        Err(e) => {
            return Err(SettingsError::Persistence(format!(
                "failed to read {}: {e}",
                path.display()
            )))
        }
    };
    if content.trim().is_empty() {
        return Ok(Document::new());
    }
    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(doc)) => Ok(doc),
        Ok(_) => Err(SettingsError::Serialization(format!(
            "{} does not hold a JSON object",
            path.display()
        ))),
        Err(e) => Err(SettingsError::Serialization(format!(
            "failed to parse {}: {e}",
            path.display()
        ))),
    }
}
