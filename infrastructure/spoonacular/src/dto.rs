use serde::Deserialize;

use business::domain::recipe::model::{DietFlags, IngredientLine, RecipeDetail, RecipeSummary};

/// `GET /recipes/{id}/information` and `GET /recipes/extract` payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeInformationDto {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub title: String,
    pub image: Option<String>,
    #[serde(default)]
    pub extended_ingredients: Vec<ExtendedIngredientDto>,
    #[serde(default)]
    pub analyzed_instructions: Vec<AnalyzedInstructionDto>,
    pub instructions: Option<String>,
    #[serde(default)]
    pub dish_types: Vec<String>,
    #[serde(default)]
    pub cuisines: Vec<String>,
    pub vegetarian: Option<bool>,
    pub vegan: Option<bool>,
    pub gluten_free: Option<bool>,
    pub dairy_free: Option<bool>,
    pub ready_in_minutes: Option<u32>,
    pub servings: Option<u32>,
    pub source_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExtendedIngredientDto {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub unit: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzedInstructionDto {
    #[serde(default)]
    pub steps: Vec<StepDto>,
}

#[derive(Debug, Deserialize)]
pub struct StepDto {
    pub step: String,
}

/// One hit of `GET /recipes/findByIngredients`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientMatchDto {
    pub id: i64,
    pub title: String,
    pub image: Option<String>,
    pub used_ingredient_count: Option<u32>,
    pub missed_ingredient_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ComplexSearchDto {
    #[serde(default)]
    pub results: Vec<SearchHitDto>,
}

#[derive(Debug, Deserialize)]
pub struct SearchHitDto {
    pub id: i64,
    pub title: String,
    pub image: Option<String>,
}

impl RecipeInformationDto {
    pub fn into_domain(self) -> RecipeDetail {
        let instructions = self.instruction_steps();
        let tags = self
            .dish_types
            .iter()
            .chain(self.cuisines.iter())
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect();

        RecipeDetail {
            id: self.id,
            title: self.title.trim().to_string(),
            image: self.image,
            ingredients: self
                .extended_ingredients
                .into_iter()
                .filter(|i| !i.name.trim().is_empty())
                .map(|i| IngredientLine::new(i.name.trim(), i.amount, i.unit.trim()))
                .collect(),
            instructions,
            tags,
            diet: DietFlags {
                vegetarian: self.vegetarian,
                vegan: self.vegan,
                gluten_free: self.gluten_free,
                dairy_free: self.dairy_free,
            },
            ready_in_minutes: self.ready_in_minutes,
            servings: self.servings,
            source_url: self.source_url,
        }
    }

    /// Analyzed steps when present, otherwise the free-text instructions split by line.
    fn instruction_steps(&self) -> Vec<String> {
        let analyzed: Vec<String> = self
            .analyzed_instructions
            .iter()
            .flat_map(|block| block.steps.iter())
            .map(|s| s.step.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if !analyzed.is_empty() {
            return analyzed;
        }

        self.instructions
            .as_deref()
            .map(|text| {
                strip_tags(text)
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl IngredientMatchDto {
    pub fn into_domain(self) -> RecipeSummary {
        RecipeSummary {
            id: self.id,
            title: self.title,
            image: self.image,
            used_ingredient_count: self.used_ingredient_count,
            missed_ingredient_count: self.missed_ingredient_count,
        }
    }
}

impl SearchHitDto {
    pub fn into_domain(self) -> RecipeSummary {
        RecipeSummary {
            id: self.id,
            title: self.title,
            image: self.image,
            used_ingredient_count: None,
            missed_ingredient_count: None,
        }
    }
}

/// Replaces HTML tags with line breaks; list markup is common in `instructions`.
fn strip_tags(text: &str) -> String {
    regex::Regex::new(r"<[^<>]+>")
        .map(|re| re.replace_all(text, "\n").to_string())
        .unwrap_or_else(|_| text.to_string())
}
