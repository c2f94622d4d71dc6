use reqwest::Client;

pub const DEFAULT_BASE_URL: &str = "https://api.spoonacular.com";

/// Shared Spoonacular HTTP client configuration.
pub struct SpoonacularClient {
    pub client: Client,
    pub api_key: String,
    pub base_url: String,
}

impl SpoonacularClient {
    pub fn new(api_key: String, base_url: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key,
            base_url: base_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }

    pub fn information_url(&self, id: i64) -> String {
        format!("{}/recipes/{}/information", self.base_url, id)
    }

    pub fn find_by_ingredients_url(&self) -> String {
        format!("{}/recipes/findByIngredients", self.base_url)
    }

    pub fn complex_search_url(&self) -> String {
        format!("{}/recipes/complexSearch", self.base_url)
    }

    pub fn extract_url(&self) -> String {
        format!("{}/recipes/extract", self.base_url)
    }
}
