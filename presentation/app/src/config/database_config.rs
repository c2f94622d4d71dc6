use persistence::db::{PoolSettings, create_postgres_pool, run_migrations};
use sqlx::PgPool;
use std::env;

pub struct DatabaseConfig {
    pub url: Option<String>,
}

impl DatabaseConfig {
    /// Environment variables:
    /// - DATABASE_URL: PostgreSQL connection string (optional; without it the
    ///   remote store is kept in memory)
    pub fn from_env() -> Self {
        Self::new(env::var("DATABASE_URL").ok())
    }

    pub fn new(url: Option<String>) -> Self {
        Self {
            url: url.filter(|u| !u.trim().is_empty()),
        }
    }

    /// Connects and migrates when a URL is configured.
    pub async fn init_database(&self) -> anyhow::Result<Option<PgPool>> {
        let Some(url) = &self.url else {
            tracing::warn!("DATABASE_URL not set, using in-memory remote store");
            return Ok(None);
        };

        let pool = create_postgres_pool(&PoolSettings::new(url.clone())).await?;
        run_migrations(&pool).await?;
        Ok(Some(pool))
    }
}
