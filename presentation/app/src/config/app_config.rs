use std::env;

use business::domain::shared::value_objects::UserId;

use super::database_config::DatabaseConfig;
use super::spoonacular_config::SpoonacularConfig;
use super::storage_config::StorageConfig;

pub struct AppConfig {
    pub user_id: UserId,
    pub database: DatabaseConfig,
    pub spoonacular: SpoonacularConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Environment variables:
    /// - APP_USER_ID: owner of the remote collections (default: "local-user")
    pub fn from_env() -> anyhow::Result<Self> {
        let user_id = env::var("APP_USER_ID")
            .ok()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| "local-user".to_string());

        Ok(Self {
            user_id: UserId::new(user_id),
            database: DatabaseConfig::from_env(),
            spoonacular: SpoonacularConfig::from_env()?,
            storage: StorageConfig::from_env(),
        })
    }
}
