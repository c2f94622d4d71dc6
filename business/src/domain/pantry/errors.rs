#[derive(Debug, thiserror::Error)]
pub enum PantryError {
    #[error("pantry.name_empty")]
    NameEmpty,
}
