use serde::{Deserialize, Serialize};

/// Identifier of the authenticated user owning the remote collections.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Path of a remote collection scoped to this user, e.g. `users/abc/pantry`.
    pub fn collection_path(&self, collection: &str) -> String {
        format!("users/{}/{}", self.0, collection)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Result of an add operation guarded by a dedup key.
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome<T> {
    Added(T),
    Duplicate,
}

impl<T> AddOutcome<T> {
    pub fn is_added(&self) -> bool {
        matches!(self, AddOutcome::Added(_))
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, AddOutcome::Duplicate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_build_user_scoped_collection_path() {
        let user_id = UserId::new("firebase-uid-123");
        assert_eq!(
            user_id.collection_path("groceryList"),
            "users/firebase-uid-123/groceryList"
        );
    }

    #[test]
    fn should_display_user_id() {
        let user_id: UserId = "test-user".into();
        assert_eq!(format!("{}", user_id), "test-user");
    }

    #[test]
    fn should_report_add_outcome_kind() {
        let added = AddOutcome::Added(1);
        let duplicate: AddOutcome<i32> = AddOutcome::Duplicate;

        assert!(added.is_added());
        assert!(!added.is_duplicate());
        assert!(duplicate.is_duplicate());
    }
}
