#[derive(Debug, thiserror::Error)]
pub enum RecipeError {
    #[error("recipe.title_empty")]
    TitleEmpty,
}

/// Failures reported by the remote recipe source.
#[derive(Debug, thiserror::Error)]
pub enum RecipeSourceError {
    #[error("recipe_source.not_found")]
    NotFound,
    #[error("recipe_source.network")]
    Network,
    #[error("recipe_source.decode")]
    Decode,
    #[error("recipe_source.extraction_failed")]
    ExtractionFailed,
}
