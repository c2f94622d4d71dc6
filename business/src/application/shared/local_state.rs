use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::errors::StorageError;
use crate::domain::sync::storage::LocalStorage;

/// Serializes `value` as JSON and stores it under `key`.
pub async fn write_blob<T: Serialize>(
    storage: &dyn LocalStorage,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let bytes = serde_json::to_vec(value).map_err(|_| StorageError::Decode)?;
    storage.save(key, bytes).await
}

/// Reads and decodes the blob stored under `key`; `Ok(None)` when absent.
pub async fn read_blob<T: DeserializeOwned>(
    storage: &dyn LocalStorage,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match storage.load(key).await? {
        Some(bytes) => serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|_| StorageError::Decode),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mockall::mock;

    mock! {
        pub Storage {}

        #[async_trait]
        impl LocalStorage for Storage {
            async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;
            async fn save(&self, key: &str, bytes: Vec<u8>) -> Result<(), StorageError>;
        }
    }

    #[tokio::test]
    async fn should_report_decode_error_for_malformed_blob() {
        let mut storage = MockStorage::new();
        storage
            .expect_load()
            .returning(|_| Ok(Some(b"{not json".to_vec())));

        let result = read_blob::<Vec<String>>(&storage, "userMealPlans").await;

        assert!(matches!(result.unwrap_err(), StorageError::Decode));
    }

    #[tokio::test]
    async fn should_return_none_when_nothing_stored() {
        let mut storage = MockStorage::new();
        storage.expect_load().returning(|_| Ok(None));

        let result = read_blob::<Vec<String>>(&storage, "userMealPlans").await;

        assert!(result.unwrap().is_none());
    }

    #[tokio::test]
    async fn should_write_json_bytes() {
        let mut storage = MockStorage::new();
        storage
            .expect_save()
            .withf(|key, bytes| key == "userRecipeCollections" && bytes == b"[\"a\"]")
            .times(1)
            .returning(|_, _| Ok(()));

        let result = write_blob(&storage, "userRecipeCollections", &vec!["a"]).await;

        assert!(result.is_ok());
    }
}
