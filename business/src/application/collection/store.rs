use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::application::shared::persisted_state::{Persisted, PersistedState};
use crate::domain::collection::errors::CollectionError;
use crate::domain::collection::model::Collection;
use crate::domain::errors::StorageError;
use crate::domain::logger::Logger;
use crate::domain::recipe::errors::RecipeError;
use crate::domain::recipe::model::{
    NewCustomRecipeProps, Recipe, RecipeDetail, RecipeOrigin, RecipePatch, RecipeSummary,
};
use crate::domain::recipe::services::RecipeSourceService;
use crate::domain::shared::value_objects::AddOutcome;
use crate::domain::sync::storage::{COLLECTIONS_KEY, LocalStorage};

impl Persisted for Vec<Collection> {
    type Stored = Vec<Collection>;

    fn to_stored(&self) -> Self::Stored {
        self.clone()
    }

    fn from_stored(stored: Self::Stored) -> Self {
        stored
    }
}

/// A search result inserted as a partial recipe, plus its detail fetch.
///
/// The handle resolves to `true` when the full recipe replaced the partial one.
/// It is `None` when no runtime was available; the recipe then stays partial.
#[derive(Debug)]
pub struct PendingRecipe {
    pub recipe: Recipe,
    pub hydration: Option<JoinHandle<bool>>,
}

/// Recipe collections, locally authoritative and saved under `userRecipeCollections`.
#[derive(Clone)]
pub struct CollectionStore {
    state: PersistedState<Vec<Collection>>,
    recipe_source: Arc<dyn RecipeSourceService>,
    logger: Arc<dyn Logger>,
}

impl CollectionStore {
    pub fn new(
        storage: Arc<dyn LocalStorage>,
        recipe_source: Arc<dyn RecipeSourceService>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            state: PersistedState::new(storage, COLLECTIONS_KEY, logger.clone()),
            recipe_source,
            logger,
        }
    }

    pub async fn load(&self) -> Result<(), StorageError> {
        self.state.load().await?;
        self.logger.info(&format!(
            "Loaded {} recipe collections",
            self.state.read(|c| c.len())
        ));
        Ok(())
    }

    pub async fn save(&self) -> Result<(), StorageError> {
        self.state.save().await
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Collection>> {
        self.state.subscribe()
    }

    pub fn collections(&self) -> Vec<Collection> {
        self.state.read(|collections| collections.clone())
    }

    pub fn collection(&self, id: Uuid) -> Option<Collection> {
        self.state
            .read(|collections| collections.iter().find(|c| c.id == id).cloned())
    }

    pub fn recipe(&self, recipe_id: Uuid, collection_id: Uuid) -> Option<Recipe> {
        self.state.read(|collections| {
            collections
                .iter()
                .find(|c| c.id == collection_id)
                .and_then(|c| c.recipe(recipe_id))
                .cloned()
        })
    }

    /// True when any collection holds a recipe with this API recipe id.
    pub fn is_recipe_tracked(&self, original_recipe_id: i64) -> bool {
        self.state
            .read(|collections| collections.iter().any(|c| c.contains_original(original_recipe_id)))
    }

    pub fn collections_containing(&self, original_recipe_id: i64) -> Vec<Collection> {
        self.state.read(|collections| {
            collections
                .iter()
                .filter(|c| c.contains_original(original_recipe_id))
                .cloned()
                .collect()
        })
    }

    pub fn create_collection(
        &self,
        name: String,
        description: Option<String>,
    ) -> Result<Collection, CollectionError> {
        let collection = Collection::new(name, description)?;
        self.logger
            .info(&format!("Creating collection: {}", collection.name));

        let created = collection.clone();
        self.state.modify(|collections| {
            collections.push(collection);
            true
        });
        Ok(created)
    }

    pub fn rename_collection(
        &self,
        id: Uuid,
        name: String,
        description: Option<String>,
    ) -> Result<Collection, CollectionError> {
        if name.trim().is_empty() {
            return Err(CollectionError::NameEmpty);
        }

        self.update_collection(id, |collection| {
            collection.name = name;
            collection.description = description.filter(|d| !d.trim().is_empty());
        })
    }

    pub fn set_cover_image(
        &self,
        id: Uuid,
        cover_image: Option<String>,
    ) -> Result<Collection, CollectionError> {
        self.update_collection(id, |collection| collection.cover_image = cover_image)
    }

    /// Removes the collection and every recipe it holds. Unknown ids are a no-op.
    pub fn delete_collection(&self, id: Uuid) -> bool {
        let deleted = self.state.modify(|collections| {
            let before = collections.len();
            collections.retain(|c| c.id != id);
            collections.len() != before
        });

        if deleted {
            self.logger.info(&format!("Deleted collection {}", id));
        }
        deleted
    }

    /// Adds a fully detailed API recipe unless the collection already holds it.
    pub fn add_recipe_from_detail(
        &self,
        detail: RecipeDetail,
        collection_id: Uuid,
    ) -> Result<AddOutcome<Recipe>, CollectionError> {
        let recipe = Recipe::from_detail(detail, RecipeOrigin::ApiRecipe, collection_id);
        self.insert_recipe(recipe)
    }

    /// Inserts a partial recipe now and fetches its detail in the background.
    pub fn add_recipe_from_search_result(
        &self,
        summary: &RecipeSummary,
        collection_id: Uuid,
    ) -> Result<AddOutcome<PendingRecipe>, CollectionError> {
        let recipe = Recipe::partial(summary, collection_id);

        match self.insert_recipe(recipe)? {
            AddOutcome::Duplicate => Ok(AddOutcome::Duplicate),
            AddOutcome::Added(recipe) => {
                let hydration = self.spawn_hydration(collection_id, summary.id);
                Ok(AddOutcome::Added(PendingRecipe { recipe, hydration }))
            }
        }
    }

    fn spawn_hydration(
        &self,
        collection_id: Uuid,
        original_recipe_id: i64,
    ) -> Option<JoinHandle<bool>> {
        let Ok(handle) = Handle::try_current() else {
            self.logger.warn(&format!(
                "No runtime available, recipe {} left partial",
                original_recipe_id
            ));
            return None;
        };

        let store = self.clone();
        Some(handle.spawn(async move {
            store.hydrate(collection_id, original_recipe_id).await
        }))
    }

    pub fn add_imported_recipe(
        &self,
        detail: RecipeDetail,
        collection_id: Uuid,
    ) -> Result<Recipe, CollectionError> {
        let recipe = Recipe::from_detail(detail, RecipeOrigin::Imported, collection_id);
        self.push_recipe(recipe)
    }

    pub fn add_custom_recipe(
        &self,
        props: NewCustomRecipeProps,
        collection_id: Uuid,
    ) -> Result<Recipe, CollectionError> {
        let recipe = Recipe::custom(props, collection_id)?;
        self.push_recipe(recipe)
    }

    /// Extracts a recipe from a web page and adds it as imported.
    pub async fn import_from_url(
        &self,
        url: &str,
        collection_id: Uuid,
    ) -> Result<Recipe, CollectionError> {
        let parsed = url::Url::parse(url.trim()).map_err(|_| CollectionError::InvalidUrl)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CollectionError::InvalidUrl);
        }
        if self.collection(collection_id).is_none() {
            return Err(CollectionError::NotFound);
        }

        self.logger.info(&format!("Importing recipe from {}", parsed));
        let mut detail = self
            .recipe_source
            .extract_from_url(parsed.as_str())
            .await
            .map_err(|e| {
                self.logger
                    .error(&format!("Failed to import recipe from {}: {}", parsed, e));
                CollectionError::ImportFailed
            })?;

        if detail.source_url.is_none() {
            detail.source_url = Some(parsed.to_string());
        }
        self.add_imported_recipe(detail, collection_id)
    }

    /// Removes a recipe. Missing recipes or collections are a no-op.
    pub fn remove_recipe(&self, recipe_id: Uuid, collection_id: Uuid) -> bool {
        self.state.modify(|collections| {
            collections
                .iter_mut()
                .find(|c| c.id == collection_id)
                .is_some_and(|c| c.remove_recipe(recipe_id))
        })
    }

    pub fn update_recipe(
        &self,
        recipe_id: Uuid,
        collection_id: Uuid,
        patch: RecipePatch,
    ) -> Result<Recipe, CollectionError> {
        if let Some(title) = &patch.title
            && title.trim().is_empty()
        {
            return Err(RecipeError::TitleEmpty.into());
        }

        let mut outcome = Err(CollectionError::NotFound);
        self.state.modify(|collections| {
            let Some(collection) = collections.iter_mut().find(|c| c.id == collection_id) else {
                return false;
            };
            let Some(recipe) = collection.recipe_mut(recipe_id) else {
                outcome = Err(CollectionError::RecipeNotFound);
                return false;
            };

            recipe.apply(patch);
            outcome = Ok(recipe.clone());
            true
        });
        outcome
    }

    /// Fetches full detail for `original_recipe_id` and applies it.
    pub async fn hydrate(&self, collection_id: Uuid, original_recipe_id: i64) -> bool {
        match self.recipe_source.fetch_detail(original_recipe_id).await {
            Ok(detail) => self.apply_hydration(collection_id, detail),
            Err(e) => {
                self.logger.error(&format!(
                    "Failed to fetch detail for recipe {}: {}",
                    original_recipe_id, e
                ));
                false
            }
        }
    }

    /// Replaces, in place, the recipe currently holding `detail.id` in the collection.
    ///
    /// The target is looked up again at apply time; when it has been removed the
    /// detail is dropped.
    pub fn apply_hydration(&self, collection_id: Uuid, detail: RecipeDetail) -> bool {
        let original_recipe_id = detail.id;
        let applied = self.state.modify(|collections| {
            let Some(recipe) = collections
                .iter_mut()
                .find(|c| c.id == collection_id)
                .and_then(|c| c.recipe_by_original_mut(original_recipe_id))
            else {
                return false;
            };

            *recipe = recipe.hydrated(detail);
            true
        });

        if applied {
            self.logger
                .debug(&format!("Hydrated recipe {}", original_recipe_id));
        } else {
            self.logger.debug(&format!(
                "Recipe {} is gone, dropping its detail",
                original_recipe_id
            ));
        }
        applied
    }

    fn update_collection(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Collection),
    ) -> Result<Collection, CollectionError> {
        let mut outcome = Err(CollectionError::NotFound);
        self.state.modify(|collections| {
            let Some(collection) = collections.iter_mut().find(|c| c.id == id) else {
                return false;
            };
            f(collection);
            outcome = Ok(collection.clone());
            true
        });
        outcome
    }

    /// Appends an API recipe unless its original id is already in the collection.
    fn insert_recipe(&self, recipe: Recipe) -> Result<AddOutcome<Recipe>, CollectionError> {
        let mut outcome = Err(CollectionError::NotFound);
        self.state.modify(|collections| {
            let Some(collection) = collections
                .iter_mut()
                .find(|c| c.id == recipe.collection_id)
            else {
                return false;
            };

            if let Some(original_recipe_id) = recipe.original_recipe_id
                && collection.contains_original(original_recipe_id)
            {
                outcome = Ok(AddOutcome::Duplicate);
                return false;
            }

            outcome = Ok(AddOutcome::Added(recipe.clone()));
            collection.recipes.push(recipe);
            true
        });

        if let Ok(AddOutcome::Duplicate) = &outcome {
            self.logger
                .info("Recipe already in collection, skipping");
        }
        outcome
    }

    fn push_recipe(&self, recipe: Recipe) -> Result<Recipe, CollectionError> {
        let added = recipe.clone();
        let pushed = self.state.modify(|collections| {
            match collections.iter_mut().find(|c| c.id == recipe.collection_id) {
                Some(collection) => {
                    collection.recipes.push(recipe);
                    true
                }
                None => false,
            }
        });

        if pushed {
            Ok(added)
        } else {
            Err(CollectionError::NotFound)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recipe::errors::RecipeSourceError;
    use crate::domain::recipe::model::{DietFlags, IngredientLine, SearchFilters};
    use async_trait::async_trait;
    use mockall::mock;

    mock! {
        pub Storage {}

        #[async_trait]
        impl LocalStorage for Storage {
            async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;
            async fn save(&self, key: &str, bytes: Vec<u8>) -> Result<(), StorageError>;
        }
    }

    mock! {
        pub RecipeSource {}

        #[async_trait]
        impl RecipeSourceService for RecipeSource {
            async fn fetch_detail(&self, id: i64) -> Result<RecipeDetail, RecipeSourceError>;
            async fn search_by_ingredients(&self, ingredients: &[String], filters: &SearchFilters) -> Result<Vec<RecipeSummary>, RecipeSourceError>;
            async fn search_by_query(&self, query: &str, filters: &SearchFilters) -> Result<Vec<RecipeSummary>, RecipeSourceError>;
            async fn extract_from_url(&self, url: &str) -> Result<RecipeDetail, RecipeSourceError>;
        }
    }

    mock! {
        pub Log {}

        impl Logger for Log {
            fn info(&self, message: &str);
            fn warn(&self, message: &str);
            fn error(&self, message: &str);
            fn debug(&self, message: &str);
        }
    }

    fn mock_logger() -> Arc<dyn Logger> {
        let mut logger = MockLog::new();
        logger.expect_info().returning(|_| ());
        logger.expect_warn().returning(|_| ());
        logger.expect_error().returning(|_| ());
        logger.expect_debug().returning(|_| ());
        Arc::new(logger)
    }

    fn accepting_storage() -> MockStorage {
        let mut storage = MockStorage::new();
        storage.expect_load().returning(|_| Ok(None));
        storage.expect_save().returning(|_, _| Ok(()));
        storage
    }

    fn summary(id: i64) -> RecipeSummary {
        RecipeSummary {
            id,
            title: format!("Recipe {}", id),
            image: None,
            used_ingredient_count: Some(2),
            missed_ingredient_count: Some(1),
        }
    }

    fn detail(id: i64) -> RecipeDetail {
        RecipeDetail {
            id,
            title: format!("Recipe {}", id),
            image: Some("https://img.example/full.jpg".to_string()),
            ingredients: vec![IngredientLine::new("tomato", 2.0, "")],
            instructions: vec!["Chop.".to_string(), "Simmer.".to_string()],
            tags: vec!["main course".to_string()],
            diet: DietFlags::default(),
            ready_in_minutes: Some(25),
            servings: Some(4),
            source_url: None,
        }
    }

    fn detail_source() -> MockRecipeSource {
        let mut source = MockRecipeSource::new();
        source.expect_fetch_detail().returning(|id| Ok(detail(id)));
        source
    }

    fn store_with(source: MockRecipeSource) -> CollectionStore {
        CollectionStore::new(Arc::new(accepting_storage()), Arc::new(source), mock_logger())
    }

    fn custom_props(title: &str) -> NewCustomRecipeProps {
        NewCustomRecipeProps {
            title: title.to_string(),
            image: None,
            ingredients: vec![],
            instructions: vec!["Mix.".to_string()],
            tags: vec![],
            diet: DietFlags::default(),
        }
    }

    #[tokio::test]
    async fn should_hydrate_partial_recipe_in_place() {
        let store = store_with(detail_source());
        let collection = store.create_collection("Dinners".to_string(), None).unwrap();

        let AddOutcome::Added(pending) = store
            .add_recipe_from_search_result(&summary(42), collection.id)
            .unwrap()
        else {
            panic!("expected recipe to be added");
        };
        assert!(pending.recipe.is_partial());

        assert!(pending.hydration.unwrap().await.unwrap());

        let recipes = store.collection(collection.id).unwrap().recipes;
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].id, pending.recipe.id);
        assert_eq!(recipes[0].original_recipe_id, Some(42));
        assert!(!recipes[0].is_partial());
    }

    #[test]
    fn should_keep_partial_recipe_when_no_runtime_is_available() {
        let mut source = MockRecipeSource::new();
        source.expect_fetch_detail().never();
        let store = store_with(source);
        let collection = store.create_collection("Dinners".to_string(), None).unwrap();

        let AddOutcome::Added(pending) = store
            .add_recipe_from_search_result(&summary(42), collection.id)
            .unwrap()
        else {
            panic!("expected recipe to be added");
        };

        assert!(pending.hydration.is_none());
        let recipes = store.collection(collection.id).unwrap().recipes;
        assert_eq!(recipes.len(), 1);
        assert!(recipes[0].is_partial());
    }

    #[tokio::test]
    async fn should_drop_hydration_for_removed_recipe() {
        let store = store_with(detail_source());
        let collection = store.create_collection("Dinners".to_string(), None).unwrap();

        let AddOutcome::Added(pending) = store
            .add_recipe_from_search_result(&summary(42), collection.id)
            .unwrap()
        else {
            panic!("expected recipe to be added");
        };
        assert!(store.remove_recipe(pending.recipe.id, collection.id));

        assert!(!pending.hydration.unwrap().await.unwrap());
        assert!(store.collection(collection.id).unwrap().recipes.is_empty());
    }

    #[tokio::test]
    async fn should_keep_partial_recipe_when_detail_fetch_fails() {
        let mut source = MockRecipeSource::new();
        source
            .expect_fetch_detail()
            .returning(|_| Err(RecipeSourceError::Network));
        let store = store_with(source);
        let collection = store.create_collection("Dinners".to_string(), None).unwrap();

        let AddOutcome::Added(pending) = store
            .add_recipe_from_search_result(&summary(7), collection.id)
            .unwrap()
        else {
            panic!("expected recipe to be added");
        };

        assert!(!pending.hydration.unwrap().await.unwrap());
        let recipes = store.collection(collection.id).unwrap().recipes;
        assert_eq!(recipes.len(), 1);
        assert!(recipes[0].is_partial());
    }

    #[tokio::test]
    async fn should_skip_search_result_already_in_collection() {
        let mut source = MockRecipeSource::new();
        source.expect_fetch_detail().never();
        let store = store_with(source);
        let collection = store.create_collection("Dinners".to_string(), None).unwrap();
        store
            .add_recipe_from_detail(detail(42), collection.id)
            .unwrap();

        let outcome = store
            .add_recipe_from_search_result(&summary(42), collection.id)
            .unwrap();

        assert!(outcome.is_duplicate());
        assert_eq!(store.collection(collection.id).unwrap().recipes.len(), 1);
    }

    #[tokio::test]
    async fn should_allow_same_recipe_in_different_collections() {
        let store = store_with(MockRecipeSource::new());
        let dinners = store.create_collection("Dinners".to_string(), None).unwrap();
        let favourites = store.create_collection("Favourites".to_string(), None).unwrap();

        store.add_recipe_from_detail(detail(9), dinners.id).unwrap();
        store.add_recipe_from_detail(detail(9), favourites.id).unwrap();

        assert_eq!(store.collections_containing(9).len(), 2);
    }

    #[tokio::test]
    async fn should_forget_recipes_of_deleted_collection() {
        let store = store_with(MockRecipeSource::new());
        let collection = store.create_collection("Soups".to_string(), None).unwrap();
        store.add_recipe_from_detail(detail(5), collection.id).unwrap();
        assert!(store.is_recipe_tracked(5));

        assert!(store.delete_collection(collection.id));

        assert!(store.collections_containing(5).is_empty());
        assert!(!store.is_recipe_tracked(5));
    }

    #[tokio::test]
    async fn should_notify_subscribers_on_create() {
        let store = store_with(MockRecipeSource::new());
        let changes = store.subscribe();

        store.create_collection("Lunches".to_string(), None).unwrap();

        assert!(changes.has_changed().unwrap());
        assert_eq!(changes.borrow().len(), 1);
    }

    #[tokio::test]
    async fn should_fail_adding_to_unknown_collection() {
        let store = store_with(MockRecipeSource::new());

        let result = store.add_custom_recipe(custom_props("Toast"), Uuid::new_v4());

        assert!(matches!(result.unwrap_err(), CollectionError::NotFound));
    }

    #[tokio::test]
    async fn should_update_recipe_fields_from_patch() {
        let store = store_with(MockRecipeSource::new());
        let collection = store.create_collection("Breakfast".to_string(), None).unwrap();
        let recipe = store
            .add_custom_recipe(custom_props("Toast"), collection.id)
            .unwrap();

        let updated = store
            .update_recipe(
                recipe.id,
                collection.id,
                RecipePatch {
                    title: Some("French toast".to_string()),
                    ..RecipePatch::default()
                },
            )
            .unwrap();

        assert_eq!(updated.title, "French toast");
        assert_eq!(
            store.recipe(recipe.id, collection.id).unwrap().title,
            "French toast"
        );
    }

    #[tokio::test]
    async fn should_report_missing_recipe_on_update() {
        let store = store_with(MockRecipeSource::new());
        let collection = store.create_collection("Breakfast".to_string(), None).unwrap();

        let result = store.update_recipe(Uuid::new_v4(), collection.id, RecipePatch::default());

        assert!(matches!(result.unwrap_err(), CollectionError::RecipeNotFound));
    }

    #[tokio::test]
    async fn should_rename_collection_and_reject_blank_name() {
        let store = store_with(MockRecipeSource::new());
        let collection = store.create_collection("Soups".to_string(), None).unwrap();

        let renamed = store
            .rename_collection(collection.id, "Winter soups".to_string(), Some("Warm".to_string()))
            .unwrap();
        assert_eq!(renamed.name, "Winter soups");

        let result = store.rename_collection(collection.id, " ".to_string(), None);
        assert!(matches!(result.unwrap_err(), CollectionError::NameEmpty));
    }

    #[tokio::test]
    async fn should_import_recipe_from_url() {
        let mut source = MockRecipeSource::new();
        source
            .expect_extract_from_url()
            .withf(|url| url == "https://cooking.example/lasagna")
            .times(1)
            .returning(|_| Ok(detail(0)));
        let store = store_with(source);
        let collection = store.create_collection("Imports".to_string(), None).unwrap();

        let recipe = store
            .import_from_url("https://cooking.example/lasagna", collection.id)
            .await
            .unwrap();

        assert_eq!(recipe.source, RecipeOrigin::Imported);
        assert_eq!(recipe.original_recipe_id, None);
        assert_eq!(recipe.source_url.as_deref(), Some("https://cooking.example/lasagna"));
    }

    #[tokio::test]
    async fn should_reject_invalid_import_url() {
        let mut source = MockRecipeSource::new();
        source.expect_extract_from_url().never();
        let store = store_with(source);
        let collection = store.create_collection("Imports".to_string(), None).unwrap();

        let result = store.import_from_url("not a url", collection.id).await;

        assert!(matches!(result.unwrap_err(), CollectionError::InvalidUrl));
    }

    #[tokio::test]
    async fn should_report_failed_extraction() {
        let mut source = MockRecipeSource::new();
        source
            .expect_extract_from_url()
            .returning(|_| Err(RecipeSourceError::ExtractionFailed));
        let store = store_with(source);
        let collection = store.create_collection("Imports".to_string(), None).unwrap();

        let result = store
            .import_from_url("https://cooking.example/broken", collection.id)
            .await;

        assert!(matches!(result.unwrap_err(), CollectionError::ImportFailed));
    }

    #[tokio::test]
    async fn should_restore_collections_from_storage() {
        let saved = {
            let store = store_with(MockRecipeSource::new());
            let collection = store.create_collection("Soups".to_string(), None).unwrap();
            store.add_recipe_from_detail(detail(3), collection.id).unwrap();
            serde_json::to_vec(&store.collections()).unwrap()
        };
        let mut storage = MockStorage::new();
        storage
            .expect_load()
            .withf(|key| key == "userRecipeCollections")
            .returning(move |_| Ok(Some(saved.clone())));
        let store = CollectionStore::new(
            Arc::new(storage),
            Arc::new(MockRecipeSource::new()),
            mock_logger(),
        );

        store.load().await.unwrap();

        let collections = store.collections();
        assert_eq!(collections.len(), 1);
        assert_eq!(collections[0].recipes[0].original_recipe_id, Some(3));
    }
}
