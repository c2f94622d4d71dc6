#[derive(Debug, thiserror::Error)]
pub enum GroceryError {
    #[error("grocery.name_empty")]
    NameEmpty,
}
