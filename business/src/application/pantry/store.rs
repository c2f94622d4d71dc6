use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use uuid::Uuid;

use crate::application::shared::synced_collection::SyncedCollection;
use crate::domain::category::categorizer::categorize;
use crate::domain::category::model::Category;
use crate::domain::logger::Logger;
use crate::domain::pantry::errors::PantryError;
use crate::domain::pantry::model::{Ingredient, dedup_key};
use crate::domain::shared::value_objects::{AddOutcome, UserId};
use crate::domain::sync::remote::RemoteSync;

pub const PANTRY_COLLECTION: &str = "pantry";

/// Ingredients the user owns, mirrored from `users/{uid}/pantry`.
pub struct PantryStore {
    collection: SyncedCollection<Ingredient>,
    logger: Arc<dyn Logger>,
}

impl PantryStore {
    pub async fn start(remote: Arc<dyn RemoteSync>, user_id: &UserId, logger: Arc<dyn Logger>) -> Self {
        let collection = SyncedCollection::start(
            remote,
            user_id.collection_path(PANTRY_COLLECTION),
            "pantry",
            logger.clone(),
        )
        .await;

        Self { collection, logger }
    }

    pub fn ingredients(&self) -> Vec<Ingredient> {
        self.collection.items()
    }

    pub fn ingredients_by_category(&self) -> BTreeMap<Category, Vec<Ingredient>> {
        let mut grouped: BTreeMap<Category, Vec<Ingredient>> = BTreeMap::new();
        for ingredient in self.collection.items() {
            grouped.entry(ingredient.category).or_default().push(ingredient);
        }
        grouped
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Ingredient>> {
        self.collection.subscribe()
    }

    /// True when an ingredient with the same name (ignoring case) is cached.
    pub fn is_duplicate(&self, name: &str) -> bool {
        let key = dedup_key(name);
        self.collection.any(|i| dedup_key(&i.name) == key)
    }

    /// Adds an ingredient unless one with the same name exists.
    ///
    /// Without an explicit category the name is categorized. The local cache
    /// only reflects the new ingredient once the remote snapshot arrives.
    pub async fn add_ingredient(
        &self,
        name: String,
        category: Option<Category>,
        date_bought: Option<DateTime<Utc>>,
    ) -> Result<AddOutcome<Ingredient>, PantryError> {
        let category = category.unwrap_or_else(|| categorize(&name));
        let ingredient = Ingredient::new(name, category, date_bought)?;

        if self.is_duplicate(&ingredient.name) {
            self.logger.info(&format!(
                "Pantry already contains {}, skipping",
                ingredient.name
            ));
            return Ok(AddOutcome::Duplicate);
        }

        self.logger
            .info(&format!("Adding pantry ingredient: {}", ingredient.name));
        self.collection
            .write(&ingredient.id.to_string(), &ingredient)
            .await;
        Ok(AddOutcome::Added(ingredient))
    }

    pub async fn update_ingredient(&self, ingredient: &Ingredient) -> bool {
        self.logger
            .info(&format!("Updating pantry ingredient: {}", ingredient.id));
        self.collection
            .write(&ingredient.id.to_string(), ingredient)
            .await
    }

    /// Moves a cached ingredient to another category. Unknown ids are ignored.
    pub async fn update_category(&self, id: Uuid, category: Category) -> bool {
        let Some(mut ingredient) = self.collection.find(|i| i.id == id) else {
            self.logger
                .debug(&format!("Pantry ingredient {} not found, skipping", id));
            return false;
        };

        ingredient.category = category;
        self.update_ingredient(&ingredient).await
    }

    pub async fn delete_ingredient(&self, id: Uuid) -> bool {
        self.logger
            .info(&format!("Deleting pantry ingredient: {}", id));
        self.collection.delete(&id.to_string()).await
    }

    pub async fn clear_all(&self) -> usize {
        self.collection.delete_all().await
    }
}
