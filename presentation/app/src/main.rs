use dotenvy::dotenv;

mod config;
mod setup;

use config::app_config::AppConfig;
use setup::{dependency_injection::DependencyContainer, runtime::Runtime};

/// Pantry sync entry point
///
/// Loads configuration, wires one instance of every store, restores local
/// state and keeps the remote listeners running until Ctrl-C.
///
/// - config/: Environment configuration (user, database, recipe API, storage)
/// - setup/: Dependency injection and store lifecycle
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing with RUST_LOG env filter
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    // 2. Load environment variables
    dotenv().ok();

    // 3. Load configuration
    let config = AppConfig::from_env()?;

    // 4. Connect the remote store, if configured
    let pool = config.database.init_database().await?;

    // 5. Wire dependencies
    let container = DependencyContainer::new(&config, pool).await?;

    // 6. Run until shutdown
    Runtime::run(container).await?;

    Ok(())
}
