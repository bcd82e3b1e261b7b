use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub post_id: u64,
    pub author_id: u64,
    pub body: String,
}

/// Payload for commenting on a post.
#[derive(Debug, Clone)]
pub struct CommentCreate {
    pub post_id: u64,
    pub author_id: u64,
    pub body: String,
}
