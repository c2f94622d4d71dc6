use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::domain::logger::Logger;
use crate::domain::sync::remote::{
    RemoteDocument, RemoteSync, SnapshotReceiver, decode_snapshot, document_path,
};

/// Local mirror of a remote collection kept current by a snapshot listener.
///
/// Every snapshot replaces the cached items wholesale. Writes go to the
/// remote store only; the cache changes when the next snapshot arrives.
pub struct SyncedCollection<T> {
    remote: Arc<dyn RemoteSync>,
    path: String,
    label: &'static str,
    state: Arc<watch::Sender<Vec<T>>>,
    logger: Arc<dyn Logger>,
    listener: Option<JoinHandle<()>>,
}

impl<T> SyncedCollection<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Subscribes to `path` and spawns the listener task.
    ///
    /// A failed subscription is logged and leaves an empty cache.
    pub async fn start(
        remote: Arc<dyn RemoteSync>,
        path: String,
        label: &'static str,
        logger: Arc<dyn Logger>,
    ) -> Self {
        let (sender, _) = watch::channel(Vec::new());
        let state = Arc::new(sender);

        let listener = match remote.subscribe(&path).await {
            Ok(receiver) => {
                logger.info(&format!("Listening to {} at {}", label, path));
                Some(tokio::spawn(listen(
                    receiver,
                    state.clone(),
                    logger.clone(),
                    label,
                )))
            }
            Err(e) => {
                logger.error(&format!("Failed to subscribe to {}: {}", label, e));
                None
            }
        };

        Self {
            remote,
            path,
            label,
            state,
            logger,
            listener,
        }
    }

    pub fn items(&self) -> Vec<T> {
        self.state.borrow().clone()
    }

    pub fn any(&self, predicate: impl Fn(&T) -> bool) -> bool {
        self.state.borrow().iter().any(predicate)
    }

    pub fn find(&self, predicate: impl Fn(&T) -> bool) -> Option<T> {
        self.state.borrow().iter().find(|item| predicate(item)).cloned()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<T>> {
        self.state.subscribe()
    }

    /// Writes `item` as document `id`. Failures are logged and reported as `false`.
    pub async fn write(&self, id: &str, item: &T) -> bool {
        let doc = match serde_json::to_value(item) {
            Ok(doc) => doc,
            Err(e) => {
                self.logger
                    .error(&format!("Failed to encode {} document {}: {}", self.label, id, e));
                return false;
            }
        };

        match self.remote.write(&document_path(&self.path, id), doc).await {
            Ok(()) => true,
            Err(e) => {
                self.logger
                    .error(&format!("Failed to write {} document {}: {}", self.label, id, e));
                false
            }
        }
    }

    pub async fn delete(&self, id: &str) -> bool {
        match self.remote.delete(&document_path(&self.path, id)).await {
            Ok(()) => true,
            Err(e) => {
                self.logger
                    .error(&format!("Failed to delete {} document {}: {}", self.label, id, e));
                false
            }
        }
    }

    /// Deletes, in one batch, every document whose `field` equals `value`.
    pub async fn delete_matching(&self, field: &str, value: serde_json::Value) -> usize {
        match self.remote.query(&self.path, field, value).await {
            Ok(documents) => self.batch_delete(documents).await,
            Err(e) => {
                self.logger
                    .error(&format!("Failed to query {} by {}: {}", self.label, field, e));
                0
            }
        }
    }

    pub async fn delete_all(&self) -> usize {
        match self.remote.fetch(&self.path).await {
            Ok(documents) => self.batch_delete(documents).await,
            Err(e) => {
                self.logger
                    .error(&format!("Failed to fetch {}: {}", self.label, e));
                0
            }
        }
    }

    async fn batch_delete(&self, documents: Vec<RemoteDocument>) -> usize {
        if documents.is_empty() {
            return 0;
        }

        let paths: Vec<String> = documents
            .iter()
            .map(|doc| document_path(&self.path, &doc.id))
            .collect();

        match self.remote.batch_delete(&paths).await {
            Ok(()) => {
                self.logger
                    .info(&format!("Deleted {} {} documents", paths.len(), self.label));
                paths.len()
            }
            Err(e) => {
                self.logger
                    .error(&format!("Failed to batch delete {}: {}", self.label, e));
                0
            }
        }
    }
}

impl<T> Drop for SyncedCollection<T> {
    fn drop(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }
    }
}

async fn listen<T: DeserializeOwned>(
    mut receiver: SnapshotReceiver,
    state: Arc<watch::Sender<Vec<T>>>,
    logger: Arc<dyn Logger>,
    label: &'static str,
) {
    while let Some(snapshot) = receiver.recv().await {
        let (items, skipped) = decode_snapshot::<T>(&snapshot);
        if skipped > 0 {
            logger.warn(&format!("Skipped {} malformed {} documents", skipped, label));
        }
        logger.debug(&format!("{} snapshot with {} documents", label, items.len()));
        state.send_replace(items);
    }

    logger.info(&format!("{} listener closed", label));
}
