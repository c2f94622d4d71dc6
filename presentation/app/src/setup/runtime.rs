use business::domain::meal_plan::value_objects::PlanDate;
use tokio::task::JoinHandle;

use super::dependency_injection::DependencyContainer;

/// Store lifecycle: restore local state, report remote changes, save on shutdown.
pub struct Runtime;

impl Runtime {
    pub async fn run(container: DependencyContainer) -> anyhow::Result<()> {
        container.collections.load().await?;
        container.meal_plans.load().await?;

        let today = PlanDate::today();
        tracing::info!(
            collections = container.collections.collections().len(),
            planned_today = container.meal_plans.has_plan_for(today),
            "Local state restored"
        );

        let watchers = [
            Self::watch_pantry(&container),
            Self::watch_grocery(&container),
        ];

        tracing::info!("Listening for remote changes, press Ctrl-C to stop");
        tokio::signal::ctrl_c().await?;

        for watcher in watchers {
            watcher.abort();
        }

        container.collections.save().await?;
        container.meal_plans.save().await?;
        tracing::info!("Local state saved, shutting down");
        Ok(())
    }

    fn watch_pantry(container: &DependencyContainer) -> JoinHandle<()> {
        let mut changes = container.pantry.subscribe();
        tokio::spawn(async move {
            while changes.changed().await.is_ok() {
                let count = changes.borrow_and_update().len();
                tracing::info!(ingredients = count, "Pantry updated");
            }
        })
    }

    fn watch_grocery(container: &DependencyContainer) -> JoinHandle<()> {
        let mut changes = container.grocery.subscribe();
        tokio::spawn(async move {
            while changes.changed().await.is_ok() {
                let (total, completed) = {
                    let items = changes.borrow_and_update();
                    (items.len(), items.iter().filter(|i| i.completed).count())
                };
                tracing::info!(items = total, completed, "Grocery list updated");
            }
        })
    }
}
