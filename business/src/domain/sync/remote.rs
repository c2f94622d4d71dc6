use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio::sync::mpsc;

use crate::domain::errors::RemoteError;

/// A document as stored in the remote real-time store.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteDocument {
    pub id: String,
    pub data: serde_json::Value,
}

/// Full contents of a remote collection, delivered on every change.
pub type Snapshot = Vec<RemoteDocument>;

/// Receiving end of a collection subscription. Dropping it ends the subscription.
pub type SnapshotReceiver = mpsc::Receiver<Snapshot>;

/// Port to the remote real-time document store.
///
/// Paths are slash separated: a collection path such as `users/{uid}/pantry`
/// and a document path `users/{uid}/pantry/{doc_id}`.
#[async_trait]
pub trait RemoteSync: Send + Sync {
    /// Streams a full snapshot of the collection now and after every change.
    async fn subscribe(&self, collection_path: &str) -> Result<SnapshotReceiver, RemoteError>;
    /// One-shot read of every document in the collection.
    async fn fetch(&self, collection_path: &str) -> Result<Vec<RemoteDocument>, RemoteError>;
    async fn write(&self, document_path: &str, doc: serde_json::Value) -> Result<(), RemoteError>;
    async fn delete(&self, document_path: &str) -> Result<(), RemoteError>;
    async fn batch_delete(&self, document_paths: &[String]) -> Result<(), RemoteError>;
    async fn query(
        &self,
        collection_path: &str,
        field: &str,
        value: serde_json::Value,
    ) -> Result<Vec<RemoteDocument>, RemoteError>;
}

pub fn document_path(collection_path: &str, doc_id: &str) -> String {
    format!("{}/{}", collection_path, doc_id)
}

/// Splits a document path into its collection path and document id.
pub fn split_document_path(document_path: &str) -> Option<(&str, &str)> {
    document_path
        .rsplit_once('/')
        .filter(|(collection, id)| !collection.is_empty() && !id.is_empty())
}

/// Decodes every document of a snapshot, skipping malformed ones.
///
/// Returns the decoded items and the number of documents that were skipped.
pub fn decode_snapshot<T: DeserializeOwned>(snapshot: &[RemoteDocument]) -> (Vec<T>, usize) {
    let mut skipped = 0;
    let items = snapshot
        .iter()
        .filter_map(|doc| match serde_json::from_value::<T>(doc.data.clone()) {
            Ok(item) => Some(item),
            Err(_) => {
                skipped += 1;
                None
            }
        })
        .collect();
    (items, skipped)
}
