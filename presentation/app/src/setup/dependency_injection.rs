use std::sync::Arc;

use logger::TracingLogger;
use persistence::local::file_storage::FileLocalStorage;
use persistence::remote::memory::InMemoryRemoteStore;
use persistence::remote::postgres::RemoteStorePostgres;
use spoonacular::client::SpoonacularClient;
use spoonacular::recipe_source::RecipeSourceSpoonacular;

use business::application::collection::store::CollectionStore;
use business::application::grocery::store::GroceryStore;
use business::application::meal_plan::store::MealPlanStore;
use business::application::pantry::store::PantryStore;
use business::domain::logger::Logger;
use business::domain::sync::remote::RemoteSync;

use crate::config::app_config::AppConfig;

/// One instance of every store, shared by reference.
pub struct DependencyContainer {
    pub collections: Arc<CollectionStore>,
    pub pantry: Arc<PantryStore>,
    pub grocery: Arc<GroceryStore>,
    pub meal_plans: Arc<MealPlanStore>,
}

impl DependencyContainer {
    pub async fn new(config: &AppConfig, pool: Option<sqlx::PgPool>) -> anyhow::Result<Self> {
        let logger: Arc<dyn Logger> = Arc::new(TracingLogger);

        // Infrastructure adapters
        let remote: Arc<dyn RemoteSync> = match pool {
            Some(pool) => Arc::new(RemoteStorePostgres::new(pool)),
            None => Arc::new(InMemoryRemoteStore::new()),
        };
        let storage = Arc::new(FileLocalStorage::new(config.storage.data_dir.clone()));
        let recipe_source = Arc::new(RecipeSourceSpoonacular::new(SpoonacularClient::new(
            config.spoonacular.api_key.clone(),
            config.spoonacular.base_url.clone(),
        )));

        // Locally authoritative stores
        let collections = Arc::new(CollectionStore::new(
            storage.clone(),
            recipe_source,
            logger.clone(),
        ));
        let meal_plans = Arc::new(MealPlanStore::new(storage, logger.clone()));

        // Remote-synchronized stores
        let pantry =
            Arc::new(PantryStore::start(remote.clone(), &config.user_id, logger.clone()).await);
        let grocery = Arc::new(GroceryStore::start(remote, &config.user_id, logger).await);

        Ok(Self {
            collections,
            pantry,
            grocery,
            meal_plans,
        })
    }
}
