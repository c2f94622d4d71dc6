use anyhow::Context;

/// Configuration for Spoonacular API access.
pub struct SpoonacularConfig {
    pub api_key: String,
    pub base_url: Option<String>,
}

impl SpoonacularConfig {
    /// Environment variables:
    /// - SPOONACULAR_API_KEY: API key (required)
    /// - SPOONACULAR_BASE_URL: API root override, e.g. for a local mock
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = std::env::var("SPOONACULAR_API_KEY")
            .context("SPOONACULAR_API_KEY environment variable must be set")?;
        let base_url = std::env::var("SPOONACULAR_BASE_URL").ok();

        Ok(Self { api_key, base_url })
    }
}
