pub mod app_config;
pub mod database_config;
pub mod spoonacular_config;
pub mod storage_config;
