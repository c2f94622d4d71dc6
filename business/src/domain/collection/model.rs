use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::CollectionError;
use crate::domain::recipe::model::Recipe;

/// A user-named, ordered set of recipes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    pub date_created: DateTime<Utc>,
    #[serde(default)]
    pub recipes: Vec<Recipe>,
}

impl Collection {
    pub fn new(name: String, description: Option<String>) -> Result<Self, CollectionError> {
        if name.trim().is_empty() {
            return Err(CollectionError::NameEmpty);
        }

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            description: description.filter(|d| !d.trim().is_empty()),
            cover_image: None,
            date_created: Utc::now(),
            recipes: Vec::new(),
        })
    }

    pub fn contains_original(&self, original_recipe_id: i64) -> bool {
        self.recipes
            .iter()
            .any(|r| r.original_recipe_id == Some(original_recipe_id))
    }

    pub fn recipe(&self, recipe_id: Uuid) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == recipe_id)
    }

    pub fn recipe_mut(&mut self, recipe_id: Uuid) -> Option<&mut Recipe> {
        self.recipes.iter_mut().find(|r| r.id == recipe_id)
    }

    /// Looks up the recipe currently holding `original_recipe_id`.
    pub fn recipe_by_original_mut(&mut self, original_recipe_id: i64) -> Option<&mut Recipe> {
        self.recipes
            .iter_mut()
            .find(|r| r.original_recipe_id == Some(original_recipe_id))
    }

    pub fn remove_recipe(&mut self, recipe_id: Uuid) -> bool {
        let before = self.recipes.len();
        self.recipes.retain(|r| r.id != recipe_id);
        self.recipes.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recipe::model::RecipeSummary;

    fn summary(id: i64) -> RecipeSummary {
        RecipeSummary {
            id,
            title: format!("Recipe {}", id),
            image: None,
            used_ingredient_count: None,
            missed_ingredient_count: None,
        }
    }

    #[test]
    fn should_create_collection_when_name_valid() {
        let collection =
            Collection::new("Weeknight dinners".to_string(), Some("Quick ones".to_string()))
                .unwrap();

        assert_eq!(collection.name, "Weeknight dinners");
        assert_eq!(collection.description.as_deref(), Some("Quick ones"));
        assert!(collection.recipes.is_empty());
    }

    #[test]
    fn should_reject_blank_name() {
        let result = Collection::new("  ".to_string(), None);
        assert!(matches!(result.unwrap_err(), CollectionError::NameEmpty));
    }

    #[test]
    fn should_drop_blank_description() {
        let collection = Collection::new("Soups".to_string(), Some(" ".to_string())).unwrap();
        assert!(collection.description.is_none());
    }

    #[test]
    fn should_find_recipe_by_original_id() {
        let mut collection = Collection::new("Soups".to_string(), None).unwrap();
        let recipe = Recipe::partial(&summary(42), collection.id);
        let recipe_id = recipe.id;
        collection.recipes.push(recipe);

        assert!(collection.contains_original(42));
        assert!(!collection.contains_original(43));
        assert_eq!(collection.recipe_by_original_mut(42).map(|r| r.id), Some(recipe_id));
    }

    #[test]
    fn should_report_whether_recipe_was_removed() {
        let mut collection = Collection::new("Soups".to_string(), None).unwrap();
        let recipe = Recipe::partial(&summary(1), collection.id);
        let recipe_id = recipe.id;
        collection.recipes.push(recipe);

        assert!(collection.remove_recipe(recipe_id));
        assert!(!collection.remove_recipe(recipe_id));
    }
}
