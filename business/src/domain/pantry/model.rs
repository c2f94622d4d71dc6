use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::PantryError;
use crate::domain::category::model::Category;

/// An ingredient the user owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub id: Uuid,
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub date_bought: Option<DateTime<Utc>>,
}

impl Ingredient {
    pub fn new(
        name: String,
        category: Category,
        date_bought: Option<DateTime<Utc>>,
    ) -> Result<Self, PantryError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(PantryError::NameEmpty);
        }

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            category,
            date_bought,
        })
    }
}

/// Pantry dedup key: the lowercased, trimmed name.
pub fn dedup_key(name: &str) -> String {
    name.trim().to_lowercase()
}
