#[derive(Debug, thiserror::Error)]
pub enum CollectionError {
    #[error("collection.name_empty")]
    NameEmpty,
    #[error("collection.not_found")]
    NotFound,
    #[error("collection.recipe_not_found")]
    RecipeNotFound,
    #[error("collection.invalid_url")]
    InvalidUrl,
    #[error("collection.import_failed")]
    ImportFailed,
    #[error("recipe.invalid")]
    Recipe(#[from] crate::domain::recipe::errors::RecipeError),
}
