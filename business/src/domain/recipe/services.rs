use async_trait::async_trait;

use super::errors::RecipeSourceError;
use super::model::{RecipeDetail, RecipeSummary, SearchFilters};

/// Service port for the remote recipe API.
///
/// Every call is single-shot; retrying is left to the caller.
#[async_trait]
pub trait RecipeSourceService: Send + Sync {
    async fn fetch_detail(&self, id: i64) -> Result<RecipeDetail, RecipeSourceError>;

    async fn search_by_ingredients(
        &self,
        ingredients: &[String],
        filters: &SearchFilters,
    ) -> Result<Vec<RecipeSummary>, RecipeSourceError>;

    async fn search_by_query(
        &self,
        query: &str,
        filters: &SearchFilters,
    ) -> Result<Vec<RecipeSummary>, RecipeSourceError>;

    async fn extract_from_url(&self, url: &str) -> Result<RecipeDetail, RecipeSourceError>;
}
