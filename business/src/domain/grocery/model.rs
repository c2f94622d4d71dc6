use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::GroceryError;
use crate::domain::category::model::Category;
use crate::domain::recipe::model::IngredientLine;

/// Separator between the ingredient and its quantity in a grocery item name.
pub const QUANTITY_SEPARATOR: &str = " - ";

/// A shopping list entry. `name` follows the `"<ingredient> - <amount> <unit>"` convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroceryItem {
    pub id: Uuid,
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub completed: bool,
}

impl GroceryItem {
    pub fn new(name: String, category: Category) -> Result<Self, GroceryError> {
        if base_name(&name).trim().is_empty() {
            return Err(GroceryError::NameEmpty);
        }

        Ok(Self {
            id: Uuid::new_v4(),
            name: normalize_name(&name),
            category,
            completed: false,
        })
    }

    pub fn base_name(&self) -> &str {
        base_name(&self.name)
    }

    /// The `"<amount> <unit>"` part of the name, if any.
    pub fn quantity(&self) -> Option<&str> {
        self.name
            .split_once(QUANTITY_SEPARATOR)
            .map(|(_, quantity)| quantity)
    }
}

/// Ingredient part of a grocery name: everything before the first `" - "`.
pub fn base_name(name: &str) -> &str {
    match name.split_once(QUANTITY_SEPARATOR) {
        Some((base, _)) => base,
        None => name,
    }
}

/// Trims the ingredient and quantity parts separately; an empty quantity is dropped.
fn normalize_name(name: &str) -> String {
    match name.split_once(QUANTITY_SEPARATOR) {
        Some((base, quantity)) if !quantity.trim().is_empty() => {
            format!("{}{}{}", base.trim(), QUANTITY_SEPARATOR, quantity.trim())
        }
        Some((base, _)) => base.trim().to_string(),
        None => name.trim().to_string(),
    }
}

/// Grocery dedup key: the lowercased, trimmed base name.
pub fn dedup_key(name: &str) -> String {
    base_name(name).trim().to_lowercase()
}

/// Builds `"<name> - <amount> <unit>"` for a recipe ingredient line.
pub fn name_for_line(line: &IngredientLine) -> String {
    let quantity = format!("{} {}", line.formatted_amount(), line.unit.trim());
    format!("{}{}{}", line.name.trim(), QUANTITY_SEPARATOR, quantity.trim_end())
}
