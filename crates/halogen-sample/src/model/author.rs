use serde::{Deserialize, Serialize};

/// A person writing posts and comments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: u64,
    pub name: String,
    pub email: String,
}

/// Payload for registering a new author.
#[derive(Debug, Clone)]
pub struct AuthorCreate {
    pub name: String,
    pub email: String,
}

impl Author {
    /// Creates a new Author.
    ///
    /// # Notes
    /// The `id` is set by the [`BlogStore`](crate::model::BlogStore) on insert.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            email: email.into(),
        }
    }
}
