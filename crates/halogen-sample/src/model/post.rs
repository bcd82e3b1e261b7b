use serde::{Deserialize, Serialize};

/// A blog post. Unpublished posts are drafts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub author_id: u64,
    pub title: String,
    pub body: String,
    pub published: bool,
}

#[derive(Debug, Clone)]
pub struct PostCreate {
    pub author_id: u64,
    pub title: String,
    pub body: String,
    pub published: bool,
}
