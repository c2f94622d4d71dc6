use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{RwLock, broadcast, mpsc};

use business::domain::errors::RemoteError;
use business::domain::sync::remote::{
    RemoteDocument, RemoteSync, SnapshotReceiver, split_document_path,
};

const CHANGE_BUFFER: usize = 64;
const SNAPSHOT_BUFFER: usize = 16;

/// Process-local remote store. Subscribers receive a fresh snapshot of their
/// collection after every change to it.
#[derive(Clone)]
pub struct InMemoryRemoteStore {
    inner: Arc<Inner>,
}

struct Inner {
    collections: RwLock<HashMap<String, BTreeMap<String, serde_json::Value>>>,
    changes: broadcast::Sender<String>,
}

impl Default for InMemoryRemoteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRemoteStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_BUFFER);
        Self {
            inner: Arc::new(Inner {
                collections: RwLock::new(HashMap::new()),
                changes,
            }),
        }
    }

    async fn snapshot(&self, collection_path: &str) -> Vec<RemoteDocument> {
        let collections = self.inner.collections.read().await;
        collections
            .get(collection_path)
            .map(|documents| {
                documents
                    .iter()
                    .map(|(id, data)| RemoteDocument {
                        id: id.clone(),
                        data: data.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn announce(&self, collection_path: &str) {
        // No receivers simply means nobody is subscribed yet.
        let _ = self.inner.changes.send(collection_path.to_string());
    }

    async fn forward_changes(
        self,
        collection_path: String,
        mut changes: broadcast::Receiver<String>,
        sender: mpsc::Sender<Vec<RemoteDocument>>,
    ) {
        loop {
            let changed = tokio::select! {
                _ = sender.closed() => break,
                changed = changes.recv() => changed,
            };

            match changed {
                Ok(path) if path != collection_path => continue,
                Ok(_) | Err(RecvError::Lagged(_)) => {
                    if sender.send(self.snapshot(&collection_path).await).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Closed) => break,
            }
        }
    }
}

#[async_trait]
impl RemoteSync for InMemoryRemoteStore {
    async fn subscribe(&self, collection_path: &str) -> Result<SnapshotReceiver, RemoteError> {
        let changes = self.inner.changes.subscribe();
        let (sender, receiver) = mpsc::channel(SNAPSHOT_BUFFER);
        sender
            .send(self.snapshot(collection_path).await)
            .await
            .map_err(|_| RemoteError::Network)?;

        tokio::spawn(
            self.clone()
                .forward_changes(collection_path.to_string(), changes, sender),
        );
        Ok(receiver)
    }

    async fn fetch(&self, collection_path: &str) -> Result<Vec<RemoteDocument>, RemoteError> {
        Ok(self.snapshot(collection_path).await)
    }

    async fn write(&self, document_path: &str, doc: serde_json::Value) -> Result<(), RemoteError> {
        let (collection_path, doc_id) =
            split_document_path(document_path).ok_or(RemoteError::NotFound)?;

        self.inner
            .collections
            .write()
            .await
            .entry(collection_path.to_string())
            .or_default()
            .insert(doc_id.to_string(), doc);

        self.announce(collection_path);
        Ok(())
    }

    async fn delete(&self, document_path: &str) -> Result<(), RemoteError> {
        self.batch_delete(&[document_path.to_string()]).await
    }

    async fn batch_delete(&self, document_paths: &[String]) -> Result<(), RemoteError> {
        let parsed = document_paths
            .iter()
            .map(|path| split_document_path(path).ok_or(RemoteError::NotFound))
            .collect::<Result<Vec<_>, _>>()?;

        let mut touched = Vec::new();
        {
            let mut collections = self.inner.collections.write().await;
            for (collection_path, doc_id) in parsed {
                if let Some(documents) = collections.get_mut(collection_path) {
                    documents.remove(doc_id);
                }
                if !touched.contains(&collection_path) {
                    touched.push(collection_path);
                }
            }
        }

        for collection_path in touched {
            self.announce(collection_path);
        }
        Ok(())
    }

    async fn query(
        &self,
        collection_path: &str,
        field: &str,
        value: serde_json::Value,
    ) -> Result<Vec<RemoteDocument>, RemoteError> {
        Ok(self
            .snapshot(collection_path)
            .await
            .into_iter()
            .filter(|doc| doc.data.get(field) == Some(&value))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use business::application::grocery::store::GroceryStore;
    use business::application::pantry::store::PantryStore;
    use business::domain::category::model::Category;
    use business::domain::shared::value_objects::UserId;
    use logger::TracingLogger;
    use serde_json::json;
    use std::time::Duration;
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_secs(2);

    #[tokio::test]
    async fn should_send_initial_snapshot_on_subscribe() {
        let store = InMemoryRemoteStore::new();
        store
            .write("users/u1/pantry/a", json!({"name": "Rice"}))
            .await
            .unwrap();

        let mut receiver = store.subscribe("users/u1/pantry").await.unwrap();
        let snapshot = receiver.recv().await.unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, "a");
    }

    #[tokio::test]
    async fn should_push_snapshot_only_for_changed_collection() {
        let store = InMemoryRemoteStore::new();
        let mut receiver = store.subscribe("users/u1/pantry").await.unwrap();
        assert!(receiver.recv().await.unwrap().is_empty());

        store
            .write("users/u1/groceryList/x", json!({"name": "Milk"}))
            .await
            .unwrap();
        store
            .write("users/u1/pantry/a", json!({"name": "Rice"}))
            .await
            .unwrap();

        let snapshot = timeout(WAIT, receiver.recv()).await.unwrap().unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].data["name"], "Rice");
    }

    #[tokio::test]
    async fn should_query_by_field_value() {
        let store = InMemoryRemoteStore::new();
        store
            .write("users/u1/groceryList/a", json!({"name": "Milk", "completed": true}))
            .await
            .unwrap();
        store
            .write("users/u1/groceryList/b", json!({"name": "Eggs", "completed": false}))
            .await
            .unwrap();

        let done = store
            .query("users/u1/groceryList", "completed", json!(true))
            .await
            .unwrap();

        assert_eq!(done.len(), 1);
        assert_eq!(done[0].id, "a");
    }

    #[tokio::test]
    async fn should_batch_delete_documents() {
        let store = InMemoryRemoteStore::new();
        for id in ["a", "b", "c"] {
            store
                .write(&format!("users/u1/pantry/{}", id), json!({"name": id}))
                .await
                .unwrap();
        }

        store
            .batch_delete(&["users/u1/pantry/a".to_string(), "users/u1/pantry/c".to_string()])
            .await
            .unwrap();

        let remaining = store.fetch("users/u1/pantry").await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, "b");
    }

    #[tokio::test]
    async fn should_sync_pantry_through_listener() {
        let remote = Arc::new(InMemoryRemoteStore::new());
        let pantry = PantryStore::start(remote.clone(), &UserId::new("u1"), Arc::new(TracingLogger)).await;
        let mut changes = pantry.subscribe();

        let first = pantry.add_ingredient("Garlic".to_string(), None, None).await.unwrap();
        assert!(first.is_added());
        timeout(WAIT, changes.wait_for(|items| items.len() == 1))
            .await
            .unwrap()
            .unwrap();

        let second = pantry.add_ingredient("garlic".to_string(), None, None).await.unwrap();

        assert!(second.is_duplicate());
        assert_eq!(pantry.ingredients().len(), 1);
        assert_eq!(pantry.ingredients()[0].category, Category::FruitsVegetables);
    }

    #[tokio::test]
    async fn should_move_completed_groceries_into_pantry() {
        let remote = Arc::new(InMemoryRemoteStore::new());
        let user = UserId::new("u1");
        let pantry = PantryStore::start(remote.clone(), &user, Arc::new(TracingLogger)).await;
        let grocery = GroceryStore::start(remote.clone(), &user, Arc::new(TracingLogger)).await;
        let mut grocery_changes = grocery.subscribe();
        let mut pantry_changes = pantry.subscribe();

        grocery.add_item("Milk - 2 cups".to_string(), None).await.unwrap();
        grocery.add_item("Bread".to_string(), None).await.unwrap();
        timeout(WAIT, grocery_changes.wait_for(|items| items.len() == 2))
            .await
            .unwrap()
            .unwrap();
        let milk = grocery
            .items()
            .into_iter()
            .find(|item| item.base_name() == "Milk")
            .unwrap();
        grocery.toggle_completed(milk.id).await;
        timeout(WAIT, grocery_changes.wait_for(|items| items.iter().any(|i| i.completed)))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(grocery.move_completed_to_pantry(&pantry).await, 1);

        timeout(WAIT, pantry_changes.wait_for(|items| items.len() == 1))
            .await
            .unwrap()
            .unwrap();
        timeout(WAIT, grocery_changes.wait_for(|items| items.len() == 1))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(pantry.ingredients()[0].name, "Milk");
        assert_eq!(pantry.ingredients()[0].category, Category::Dairy);
        assert_eq!(grocery.items()[0].name, "Bread");
    }
}
