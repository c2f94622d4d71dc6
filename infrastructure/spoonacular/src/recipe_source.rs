use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use business::domain::recipe::errors::RecipeSourceError;
use business::domain::recipe::model::{RecipeDetail, RecipeSummary, SearchFilters};
use business::domain::recipe::services::RecipeSourceService;

use crate::client::SpoonacularClient;
use crate::dto::{ComplexSearchDto, IngredientMatchDto, RecipeInformationDto};

const RESULTS_PER_SEARCH: u32 = 20;

pub struct RecipeSourceSpoonacular {
    client: SpoonacularClient,
}

impl RecipeSourceSpoonacular {
    pub fn new(client: SpoonacularClient) -> Self {
        Self { client }
    }

    fn filter_params(filters: &SearchFilters) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if !filters.diets.is_empty() {
            params.push(("diet", filters.diets.join(",")));
        }
        if !filters.intolerances.is_empty() {
            params.push(("intolerances", filters.intolerances.join(",")));
        }
        params
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, RecipeSourceError> {
        let response = request
            .query(&[("apiKey", self.client.api_key.as_str())])
            .send()
            .await
            .map_err(|_| RecipeSourceError::Network)?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => return Err(RecipeSourceError::NotFound),
            _ => return Err(RecipeSourceError::Network),
        }

        response
            .json::<T>()
            .await
            .map_err(|_| RecipeSourceError::Decode)
    }
}

#[async_trait]
impl RecipeSourceService for RecipeSourceSpoonacular {
    async fn fetch_detail(&self, id: i64) -> Result<RecipeDetail, RecipeSourceError> {
        let request = self
            .client
            .client
            .get(self.client.information_url(id))
            .query(&[("includeNutrition", "false")]);

        let dto: RecipeInformationDto = self.get_json(request).await?;
        Ok(dto.into_domain())
    }

    async fn search_by_ingredients(
        &self,
        ingredients: &[String],
        filters: &SearchFilters,
    ) -> Result<Vec<RecipeSummary>, RecipeSourceError> {
        if ingredients.is_empty() {
            return Ok(vec![]);
        }

        let request = self
            .client
            .client
            .get(self.client.find_by_ingredients_url())
            .query(&[
                ("ingredients", ingredients.join(",")),
                ("number", RESULTS_PER_SEARCH.to_string()),
                ("ranking", "1".to_string()),
                ("ignorePantry", "true".to_string()),
            ])
            .query(&Self::filter_params(filters));

        let hits: Vec<IngredientMatchDto> = self.get_json(request).await?;
        Ok(hits.into_iter().map(|h| h.into_domain()).collect())
    }

    async fn search_by_query(
        &self,
        query: &str,
        filters: &SearchFilters,
    ) -> Result<Vec<RecipeSummary>, RecipeSourceError> {
        let request = self
            .client
            .client
            .get(self.client.complex_search_url())
            .query(&[
                ("query", query.trim().to_string()),
                ("number", RESULTS_PER_SEARCH.to_string()),
            ])
            .query(&Self::filter_params(filters));

        let page: ComplexSearchDto = self.get_json(request).await?;
        Ok(page.results.into_iter().map(|h| h.into_domain()).collect())
    }

    async fn extract_from_url(&self, url: &str) -> Result<RecipeDetail, RecipeSourceError> {
        let request = self
            .client
            .client
            .get(self.client.extract_url())
            .query(&[("url", url), ("analyze", "true")]);

        let dto: RecipeInformationDto = self
            .get_json(request)
            .await
            .map_err(|_| RecipeSourceError::ExtractionFailed)?;

        let detail = dto.into_domain();
        if detail.title.is_empty() {
            return Err(RecipeSourceError::ExtractionFailed);
        }
        Ok(detail)
    }
}
