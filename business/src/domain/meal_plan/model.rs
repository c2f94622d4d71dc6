use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::{MealType, PlanDate};

/// A recipe scheduled into a meal slot.
///
/// Title and image are captured when the item is scheduled and are not
/// refreshed when the referenced recipe changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealItem {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl MealItem {
    pub fn new(recipe_id: Uuid, title: String, image: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            recipe_id,
            title,
            image,
        }
    }
}

/// All meals scheduled on one day. Always holds an entry for every meal type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlan {
    pub date: PlanDate,
    #[serde(default)]
    pub meals: BTreeMap<MealType, Vec<MealItem>>,
}

impl MealPlan {
    pub fn empty(date: PlanDate) -> Self {
        Self {
            date,
            meals: MealType::ALL.iter().map(|t| (*t, Vec::new())).collect(),
        }
    }

    /// Restores missing meal types, e.g. after decoding older data.
    pub fn ensure_complete(&mut self) {
        for meal_type in MealType::ALL {
            self.meals.entry(meal_type).or_default();
        }
    }

    pub fn items(&self, meal_type: MealType) -> &[MealItem] {
        self.meals
            .get(&meal_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn push(&mut self, meal_type: MealType, item: MealItem) {
        self.meals.entry(meal_type).or_default().push(item);
    }

    pub fn remove(&mut self, item_id: Uuid, meal_type: MealType) -> Option<MealItem> {
        let items = self.meals.get_mut(&meal_type)?;
        let index = items.iter().position(|i| i.id == item_id)?;
        Some(items.remove(index))
    }

    pub fn is_empty(&self) -> bool {
        self.meals.values().all(Vec::is_empty)
    }
}
