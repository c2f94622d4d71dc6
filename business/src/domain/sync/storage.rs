use async_trait::async_trait;

use crate::domain::errors::StorageError;

pub const COLLECTIONS_KEY: &str = "userRecipeCollections";
pub const MEAL_PLANS_KEY: &str = "userMealPlans";

/// Port to local durable storage: one opaque blob per fixed key.
#[async_trait]
pub trait LocalStorage: Send + Sync {
    /// Returns `None` when nothing was stored under `key` yet.
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;
    async fn save(&self, key: &str, bytes: Vec<u8>) -> Result<(), StorageError>;
}
