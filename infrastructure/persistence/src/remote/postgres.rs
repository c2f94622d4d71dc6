use std::collections::BTreeSet;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgListener;
use tokio::sync::mpsc;

use business::domain::errors::RemoteError;
use business::domain::sync::remote::{
    RemoteDocument, RemoteSync, SnapshotReceiver, split_document_path,
};

use super::entity::RemoteDocumentEntity;

/// Channel used with `pg_notify`; the payload is the changed collection path.
pub const CHANGE_CHANNEL: &str = "remote_documents";

const SNAPSHOT_BUFFER: usize = 16;

/// Remote document store on Postgres, with change feeds over LISTEN/NOTIFY.
pub struct RemoteStorePostgres {
    pool: PgPool,
}

impl RemoteStorePostgres {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn load_collection(
    pool: &PgPool,
    collection_path: &str,
) -> Result<Vec<RemoteDocument>, RemoteError> {
    let entities = sqlx::query_as::<_, RemoteDocumentEntity>(
        "SELECT doc_id, body FROM remote_documents WHERE collection_path = $1 ORDER BY updated_at, doc_id",
    )
    .bind(collection_path)
    .fetch_all(pool)
    .await
    .map_err(map_read_error)?;

    Ok(entities.into_iter().map(|e| e.into_domain()).collect())
}

fn map_read_error(error: sqlx::Error) -> RemoteError {
    match error {
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => RemoteError::Decode,
        _ => RemoteError::Persistence,
    }
}

fn parse_path(document_path: &str) -> Result<(&str, &str), RemoteError> {
    split_document_path(document_path).ok_or(RemoteError::NotFound)
}

async fn forward_changes(
    mut listener: PgListener,
    pool: PgPool,
    collection_path: String,
    sender: mpsc::Sender<Vec<RemoteDocument>>,
) {
    loop {
        let notification = tokio::select! {
            _ = sender.closed() => break,
            received = listener.recv() => match received {
                Ok(notification) => notification,
                Err(error) => {
                    tracing::error!(error = %error, path = %collection_path, "Change listener failed");
                    break;
                }
            },
        };

        if notification.payload() != collection_path {
            continue;
        }

        match load_collection(&pool, &collection_path).await {
            Ok(snapshot) => {
                if sender.send(snapshot).await.is_err() {
                    break;
                }
            }
            Err(error) => {
                tracing::warn!(error = %error, path = %collection_path, "Failed to reload collection");
            }
        }
    }

    tracing::debug!(path = %collection_path, "Change listener stopped");
}

#[async_trait]
impl RemoteSync for RemoteStorePostgres {
    async fn subscribe(&self, collection_path: &str) -> Result<SnapshotReceiver, RemoteError> {
        let mut listener = PgListener::connect_with(&self.pool)
            .await
            .map_err(|_| RemoteError::Network)?;
        listener
            .listen(CHANGE_CHANNEL)
            .await
            .map_err(|_| RemoteError::Network)?;

        let (sender, receiver) = mpsc::channel(SNAPSHOT_BUFFER);
        let initial = load_collection(&self.pool, collection_path).await?;
        sender
            .send(initial)
            .await
            .map_err(|_| RemoteError::Network)?;

        tokio::spawn(forward_changes(
            listener,
            self.pool.clone(),
            collection_path.to_string(),
            sender,
        ));

        Ok(receiver)
    }

    async fn fetch(&self, collection_path: &str) -> Result<Vec<RemoteDocument>, RemoteError> {
        load_collection(&self.pool, collection_path).await
    }

    async fn write(&self, document_path: &str, doc: serde_json::Value) -> Result<(), RemoteError> {
        let (collection_path, doc_id) = parse_path(document_path)?;
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|_| RemoteError::Persistence)?;

        sqlx::query(
            r#"INSERT INTO remote_documents (collection_path, doc_id, body, updated_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (collection_path, doc_id) DO UPDATE SET
                body = EXCLUDED.body,
                updated_at = EXCLUDED.updated_at"#,
        )
        .bind(collection_path)
        .bind(doc_id)
        .bind(doc)
        .execute(&mut *tx)
        .await
        .map_err(|_| RemoteError::Persistence)?;

        notify(&mut tx, collection_path).await?;
        tx.commit().await.map_err(|_| RemoteError::Persistence)
    }

    async fn delete(&self, document_path: &str) -> Result<(), RemoteError> {
        let (collection_path, doc_id) = parse_path(document_path)?;
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|_| RemoteError::Persistence)?;

        sqlx::query("DELETE FROM remote_documents WHERE collection_path = $1 AND doc_id = $2")
            .bind(collection_path)
            .bind(doc_id)
            .execute(&mut *tx)
            .await
            .map_err(|_| RemoteError::Persistence)?;

        notify(&mut tx, collection_path).await?;
        tx.commit().await.map_err(|_| RemoteError::Persistence)
    }

    async fn batch_delete(&self, document_paths: &[String]) -> Result<(), RemoteError> {
        let parsed = document_paths
            .iter()
            .map(|path| parse_path(path))
            .collect::<Result<Vec<_>, _>>()?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|_| RemoteError::Persistence)?;

        let mut touched = BTreeSet::new();
        for (collection_path, doc_id) in parsed {
            sqlx::query("DELETE FROM remote_documents WHERE collection_path = $1 AND doc_id = $2")
                .bind(collection_path)
                .bind(doc_id)
                .execute(&mut *tx)
                .await
                .map_err(|_| RemoteError::Persistence)?;
            touched.insert(collection_path);
        }

        for collection_path in touched {
            notify(&mut tx, collection_path).await?;
        }
        tx.commit().await.map_err(|_| RemoteError::Persistence)
    }

    async fn query(
        &self,
        collection_path: &str,
        field: &str,
        value: serde_json::Value,
    ) -> Result<Vec<RemoteDocument>, RemoteError> {
        let entities = sqlx::query_as::<_, RemoteDocumentEntity>(
            "SELECT doc_id, body FROM remote_documents WHERE collection_path = $1 AND body -> $2 = $3 ORDER BY updated_at, doc_id",
        )
        .bind(collection_path)
        .bind(field)
        .bind(value)
        .fetch_all(&self.pool)
        .await
        .map_err(map_read_error)?;

        Ok(entities.into_iter().map(|e| e.into_domain()).collect())
    }
}

/// Queues a change notification; Postgres delivers it when the transaction commits.
async fn notify(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    collection_path: &str,
) -> Result<(), RemoteError> {
    sqlx::query("SELECT pg_notify($1, $2)")
        .bind(CHANGE_CHANNEL)
        .bind(collection_path)
        .execute(&mut **tx)
        .await
        .map_err(|_| RemoteError::Persistence)?;
    Ok(())
}
