use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tokio::sync::watch;
use uuid::Uuid;

use crate::application::pantry::store::PantryStore;
use crate::application::shared::synced_collection::SyncedCollection;
use crate::domain::category::categorizer::categorize;
use crate::domain::category::model::Category;
use crate::domain::grocery::errors::GroceryError;
use crate::domain::grocery::model::{GroceryItem, base_name, dedup_key, name_for_line};
use crate::domain::logger::Logger;
use crate::domain::pantry::errors::PantryError;
use crate::domain::pantry::model::Ingredient;
use crate::domain::recipe::model::IngredientLine;
use crate::domain::shared::value_objects::{AddOutcome, UserId};
use crate::domain::sync::remote::RemoteSync;

pub const GROCERY_COLLECTION: &str = "groceryList";

/// Shopping list mirrored from `users/{uid}/groceryList`.
pub struct GroceryStore {
    collection: SyncedCollection<GroceryItem>,
    logger: Arc<dyn Logger>,
}

impl GroceryStore {
    pub async fn start(remote: Arc<dyn RemoteSync>, user_id: &UserId, logger: Arc<dyn Logger>) -> Self {
        let collection = SyncedCollection::start(
            remote,
            user_id.collection_path(GROCERY_COLLECTION),
            "grocery list",
            logger.clone(),
        )
        .await;

        Self { collection, logger }
    }

    pub fn items(&self) -> Vec<GroceryItem> {
        self.collection.items()
    }

    pub fn items_by_category(&self) -> BTreeMap<Category, Vec<GroceryItem>> {
        let mut grouped: BTreeMap<Category, Vec<GroceryItem>> = BTreeMap::new();
        for item in self.collection.items() {
            grouped.entry(item.category).or_default().push(item);
        }
        grouped
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<GroceryItem>> {
        self.collection.subscribe()
    }

    /// True when a cached item has the same base name, ignoring quantity and case.
    pub fn is_duplicate(&self, name: &str) -> bool {
        let key = dedup_key(name);
        self.collection.any(|item| dedup_key(&item.name) == key)
    }

    /// Adds `name` unless its base name is already listed.
    ///
    /// Without an explicit category the base name is categorized.
    pub async fn add_item(
        &self,
        name: String,
        category: Option<Category>,
    ) -> Result<AddOutcome<GroceryItem>, GroceryError> {
        let category = category.unwrap_or_else(|| categorize(base_name(&name)));
        let item = GroceryItem::new(name, category)?;

        if self.is_duplicate(&item.name) {
            self.logger.info(&format!(
                "Grocery list already contains {}, skipping",
                item.base_name()
            ));
            return Ok(AddOutcome::Duplicate);
        }

        self.logger
            .info(&format!("Adding grocery item: {}", item.name));
        self.collection.write(&item.id.to_string(), &item).await;
        Ok(AddOutcome::Added(item))
    }

    /// Adds a recipe ingredient as `"<name> - <amount> <unit>"`.
    pub async fn add_from_ingredient_line(
        &self,
        line: &IngredientLine,
    ) -> Result<AddOutcome<GroceryItem>, GroceryError> {
        let category = categorize(&line.name);
        self.add_item(name_for_line(line), Some(category)).await
    }

    /// Adds every line whose ingredient is neither in the pantry nor already listed.
    ///
    /// Returns the number of items written.
    pub async fn add_missing_ingredients(
        &self,
        lines: &[IngredientLine],
        pantry: &PantryStore,
    ) -> usize {
        let mut seen = HashSet::new();
        let mut added = 0;

        for line in lines {
            let key = dedup_key(&line.name);
            if key.is_empty() || pantry.is_duplicate(&line.name) || !seen.insert(key) {
                continue;
            }

            if let Ok(AddOutcome::Added(_)) = self.add_from_ingredient_line(line).await {
                added += 1;
            }
        }

        self.logger.info(&format!(
            "Added {} of {} recipe ingredients to the grocery list",
            added,
            lines.len()
        ));
        added
    }

    pub async fn update_item(&self, item: &GroceryItem) -> bool {
        self.collection.write(&item.id.to_string(), item).await
    }

    /// Flips the completed flag of a cached item. Unknown ids are ignored.
    pub async fn toggle_completed(&self, id: Uuid) -> bool {
        let Some(mut item) = self.collection.find(|i| i.id == id) else {
            self.logger
                .debug(&format!("Grocery item {} not found, skipping", id));
            return false;
        };

        item.completed = !item.completed;
        self.update_item(&item).await
    }

    pub async fn delete_item(&self, id: Uuid) -> bool {
        self.logger.info(&format!("Deleting grocery item: {}", id));
        self.collection.delete(&id.to_string()).await
    }

    pub async fn clear_all(&self) -> usize {
        self.logger.info("Clearing grocery list");
        self.collection.delete_all().await
    }

    pub async fn clear_by_category(&self, category: Category) -> usize {
        self.logger
            .info(&format!("Clearing grocery items in {}", category));
        self.collection
            .delete_matching("category", json!(category))
            .await
    }

    pub async fn clear_completed(&self) -> usize {
        self.logger.info("Clearing completed grocery items");
        self.collection.delete_matching("completed", json!(true)).await
    }

    /// Copies the item's base name into the pantry, then deletes the grocery item.
    ///
    /// The grocery item is deleted also when the pantry already holds the ingredient.
    pub async fn move_to_pantry(
        &self,
        item: &GroceryItem,
        pantry: &PantryStore,
    ) -> Result<AddOutcome<Ingredient>, PantryError> {
        let outcome = pantry
            .add_ingredient(
                item.base_name().trim().to_string(),
                Some(item.category),
                Some(Utc::now()),
            )
            .await?;

        self.delete_item(item.id).await;
        Ok(outcome)
    }

    /// Moves every completed item to the pantry. Returns how many were moved.
    pub async fn move_completed_to_pantry(&self, pantry: &PantryStore) -> usize {
        let completed: Vec<GroceryItem> = self
            .collection
            .items()
            .into_iter()
            .filter(|item| item.completed)
            .collect();

        let mut moved = 0;
        for item in &completed {
            match self.move_to_pantry(item, pantry).await {
                Ok(_) => moved += 1,
                Err(e) => self
                    .logger
                    .warn(&format!("Failed to move {} to pantry: {}", item.name, e)),
            }
        }
        moved
    }
}
