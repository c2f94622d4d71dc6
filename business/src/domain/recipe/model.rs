use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::RecipeError;

/// Where a collection recipe came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecipeOrigin {
    Imported,
    Custom,
    ApiRecipe,
}

impl std::fmt::Display for RecipeOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecipeOrigin::Imported => write!(f, "imported"),
            RecipeOrigin::Custom => write!(f, "custom"),
            RecipeOrigin::ApiRecipe => write!(f, "apiRecipe"),
        }
    }
}

/// One structured ingredient row of a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientLine {
    pub name: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub unit: String,
}

impl IngredientLine {
    pub fn new(name: impl Into<String>, amount: f64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            amount,
            unit: unit.into(),
        }
    }

    /// Amount with zero decimals when integral, otherwise one decimal place.
    pub fn formatted_amount(&self) -> String {
        if self.amount.fract() == 0.0 {
            format!("{:.0}", self.amount)
        } else {
            format!("{:.1}", self.amount)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietFlags {
    #[serde(default)]
    pub vegetarian: Option<bool>,
    #[serde(default)]
    pub vegan: Option<bool>,
    #[serde(default)]
    pub gluten_free: Option<bool>,
    #[serde(default)]
    pub dairy_free: Option<bool>,
}

/// Full recipe as returned by the recipe source (detail or URL extraction).
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeDetail {
    pub id: i64,
    pub title: String,
    pub image: Option<String>,
    pub ingredients: Vec<IngredientLine>,
    pub instructions: Vec<String>,
    pub tags: Vec<String>,
    pub diet: DietFlags,
    pub ready_in_minutes: Option<u32>,
    pub servings: Option<u32>,
    pub source_url: Option<String>,
}

/// Lightweight search hit; carries no ingredients or instructions.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeSummary {
    pub id: i64,
    pub title: String,
    pub image: Option<String>,
    pub used_ingredient_count: Option<u32>,
    pub missed_ingredient_count: Option<u32>,
}

/// Diet and intolerance filters forwarded to recipe searches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilters {
    pub diets: Vec<String>,
    pub intolerances: Vec<String>,
}

/// A recipe owned by a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<IngredientLine>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub source: RecipeOrigin,
    #[serde(default)]
    pub original_recipe_id: Option<i64>,
    pub collection_id: Uuid,
    #[serde(default)]
    pub diet: DietFlags,
    #[serde(default)]
    pub ready_in_minutes: Option<u32>,
    #[serde(default)]
    pub servings: Option<u32>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default = "Utc::now")]
    pub date_added: DateTime<Utc>,
}

/// Fields of a user-authored recipe.
pub struct NewCustomRecipeProps {
    pub title: String,
    pub image: Option<String>,
    pub ingredients: Vec<IngredientLine>,
    pub instructions: Vec<String>,
    pub tags: Vec<String>,
    pub diet: DietFlags,
}

/// Partial update applied by `CollectionStore::update_recipe`.
#[derive(Debug, Clone, Default)]
pub struct RecipePatch {
    pub title: Option<String>,
    pub image: Option<Option<String>>,
    pub ingredients: Option<Vec<IngredientLine>>,
    pub instructions: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub diet: Option<DietFlags>,
}

impl Recipe {
    /// Placeholder inserted before detail hydration completes.
    pub fn partial(summary: &RecipeSummary, collection_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: summary.title.clone(),
            image: summary.image.clone(),
            ingredients: Vec::new(),
            instructions: Vec::new(),
            tags: Vec::new(),
            source: RecipeOrigin::ApiRecipe,
            original_recipe_id: Some(summary.id),
            collection_id,
            diet: DietFlags::default(),
            ready_in_minutes: None,
            servings: None,
            source_url: None,
            date_added: Utc::now(),
        }
    }

    pub fn from_detail(detail: RecipeDetail, origin: RecipeOrigin, collection_id: Uuid) -> Self {
        let original_recipe_id = match origin {
            RecipeOrigin::ApiRecipe => Some(detail.id),
            _ => None,
        };

        Self {
            id: Uuid::new_v4(),
            title: detail.title,
            image: detail.image,
            ingredients: detail.ingredients,
            instructions: detail.instructions,
            tags: detail.tags,
            source: origin,
            original_recipe_id,
            collection_id,
            diet: detail.diet,
            ready_in_minutes: detail.ready_in_minutes,
            servings: detail.servings,
            source_url: detail.source_url,
            date_added: Utc::now(),
        }
    }

    pub fn custom(props: NewCustomRecipeProps, collection_id: Uuid) -> Result<Self, RecipeError> {
        if props.title.trim().is_empty() {
            return Err(RecipeError::TitleEmpty);
        }

        Ok(Self {
            id: Uuid::new_v4(),
            title: props.title,
            image: props.image,
            ingredients: props.ingredients,
            instructions: props.instructions,
            tags: props.tags,
            source: RecipeOrigin::Custom,
            original_recipe_id: None,
            collection_id,
            diet: props.diet,
            ready_in_minutes: None,
            servings: None,
            source_url: None,
            date_added: Utc::now(),
        })
    }

    /// Full version of this recipe built from `detail`, keeping identity and placement.
    pub fn hydrated(&self, detail: RecipeDetail) -> Self {
        Self {
            id: self.id,
            collection_id: self.collection_id,
            date_added: self.date_added,
            ..Recipe::from_detail(detail, RecipeOrigin::ApiRecipe, self.collection_id)
        }
    }

    pub fn is_partial(&self) -> bool {
        self.source == RecipeOrigin::ApiRecipe
            && self.ingredients.is_empty()
            && self.instructions.is_empty()
    }

    pub fn apply(&mut self, patch: RecipePatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
        if let Some(ingredients) = patch.ingredients {
            self.ingredients = ingredients;
        }
        if let Some(instructions) = patch.instructions {
            self.instructions = instructions;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(diet) = patch.diet {
            self.diet = diet;
        }
    }
}
