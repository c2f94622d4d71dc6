use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::Arc;

use tokio::sync::watch;
use uuid::Uuid;

use crate::application::shared::persisted_state::{Persisted, PersistedState};
use crate::domain::errors::StorageError;
use crate::domain::logger::Logger;
use crate::domain::meal_plan::model::{MealItem, MealPlan};
use crate::domain::meal_plan::value_objects::{MealType, PlanDate};
use crate::domain::sync::storage::{LocalStorage, MEAL_PLANS_KEY};

pub type MealPlans = BTreeMap<PlanDate, MealPlan>;

/// Stored as an array of plans; days are rekeyed and completed on load.
impl Persisted for MealPlans {
    type Stored = Vec<MealPlan>;

    fn to_stored(&self) -> Self::Stored {
        self.values().cloned().collect()
    }

    fn from_stored(stored: Self::Stored) -> Self {
        let mut plans = MealPlans::new();
        for mut plan in stored {
            plan.ensure_complete();
            match plans.entry(plan.date) {
                Entry::Vacant(slot) => {
                    slot.insert(plan);
                }
                Entry::Occupied(mut slot) => {
                    for (meal_type, items) in plan.meals {
                        slot.get_mut().meals.entry(meal_type).or_default().extend(items);
                    }
                }
            }
        }
        plans
    }
}

/// Day-keyed meal schedule, locally authoritative and saved under `userMealPlans`.
///
/// Every date argument is reduced to its local calendar day before use.
#[derive(Clone)]
pub struct MealPlanStore {
    state: PersistedState<MealPlans>,
    logger: Arc<dyn Logger>,
}

impl MealPlanStore {
    pub fn new(storage: Arc<dyn LocalStorage>, logger: Arc<dyn Logger>) -> Self {
        Self {
            state: PersistedState::new(storage, MEAL_PLANS_KEY, logger.clone()),
            logger,
        }
    }

    pub async fn load(&self) -> Result<(), StorageError> {
        self.state.load().await?;
        self.logger.info(&format!(
            "Loaded {} meal plans",
            self.state.read(|plans| plans.len())
        ));
        Ok(())
    }

    pub async fn save(&self) -> Result<(), StorageError> {
        self.state.save().await
    }

    pub fn subscribe(&self) -> watch::Receiver<MealPlans> {
        self.state.subscribe()
    }

    /// Schedules a recipe, creating the day's plan with every meal type if needed.
    pub fn add_recipe(
        &self,
        recipe_id: Uuid,
        title: String,
        image: Option<String>,
        date: impl Into<PlanDate>,
        meal_type: MealType,
    ) -> MealItem {
        let date = date.into();
        let item = MealItem::new(recipe_id, title, image);
        self.logger
            .info(&format!("Scheduling {} for {} {}", item.title, date, meal_type));

        let scheduled = item.clone();
        self.state.modify(|plans| {
            plans
                .entry(date)
                .or_insert_with(|| MealPlan::empty(date))
                .push(meal_type, item);
            true
        });
        scheduled
    }

    /// Removes a scheduled item. Missing plans or items are a no-op.
    pub fn remove_recipe(&self, item_id: Uuid, date: impl Into<PlanDate>, meal_type: MealType) -> bool {
        let date = date.into();
        self.state.modify(|plans| {
            plans
                .get_mut(&date)
                .and_then(|plan| plan.remove(item_id, meal_type))
                .is_some()
        })
    }

    /// Moves `item` between slots keeping its id, title and image.
    ///
    /// Nothing happens when the item is not in the source slot.
    pub fn move_recipe(
        &self,
        item: &MealItem,
        from_date: impl Into<PlanDate>,
        from_meal_type: MealType,
        to_date: impl Into<PlanDate>,
        to_meal_type: MealType,
    ) -> bool {
        let from_date = from_date.into();
        let to_date = to_date.into();

        let moved = self.state.modify(|plans| {
            let Some(removed) = plans
                .get_mut(&from_date)
                .and_then(|plan| plan.remove(item.id, from_meal_type))
            else {
                return false;
            };

            plans
                .entry(to_date)
                .or_insert_with(|| MealPlan::empty(to_date))
                .push(to_meal_type, removed);
            true
        });

        if moved {
            self.logger.info(&format!(
                "Moved {} from {} {} to {} {}",
                item.title, from_date, from_meal_type, to_date, to_meal_type
            ));
        } else {
            self.logger
                .debug(&format!("Meal item {} not found, nothing to move", item.id));
        }
        moved
    }

    pub fn meals_for(&self, date: impl Into<PlanDate>, meal_type: MealType) -> Vec<MealItem> {
        let date = date.into();
        self.state.read(|plans| {
            plans
                .get(&date)
                .map(|plan| plan.items(meal_type).to_vec())
                .unwrap_or_default()
        })
    }

    /// True when the day has at least one scheduled item.
    pub fn has_plan_for(&self, date: impl Into<PlanDate>) -> bool {
        let date = date.into();
        self.state
            .read(|plans| plans.get(&date).is_some_and(|plan| !plan.is_empty()))
    }

    pub fn plan_for(&self, date: impl Into<PlanDate>) -> Option<MealPlan> {
        let date = date.into();
        self.state.read(|plans| plans.get(&date).cloned())
    }

    /// Seven consecutive days from `start`; unplanned days come back empty.
    pub fn week(&self, start: impl Into<PlanDate>) -> Vec<MealPlan> {
        let start = start.into();
        self.state.read(|plans| {
            (0..7)
                .map(|offset| {
                    let date = start.plus_days(offset);
                    plans
                        .get(&date)
                        .cloned()
                        .unwrap_or_else(|| MealPlan::empty(date))
                })
                .collect()
        })
    }

    pub fn clear_day(&self, date: impl Into<PlanDate>) -> bool {
        let date = date.into();
        let cleared = self.state.modify(|plans| plans.remove(&date).is_some());
        if cleared {
            self.logger.info(&format!("Cleared meal plan for {}", date));
        }
        cleared
    }
}
