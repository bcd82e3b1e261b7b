//! In-memory storage for the blog domain.
//!
//! Records live in `BTreeMap`s so listings come back in insertion (id) order.
//! Ids are handed out from one atomic counter shared by all record types.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use tracing::debug;

use crate::error::BlogError;
use crate::model::{Author, AuthorCreate, Comment, CommentCreate, Post, PostCreate};

#[derive(Debug)]
pub struct BlogStore {
    next_id: AtomicU64,
    authors: RwLock<BTreeMap<u64, Author>>,
    posts: RwLock<BTreeMap<u64, Post>>,
    comments: RwLock<BTreeMap<u64, Comment>>,
}

impl BlogStore {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            authors: RwLock::new(BTreeMap::new()),
            posts: RwLock::new(BTreeMap::new()),
            comments: RwLock::new(BTreeMap::new()),
        }
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    pub fn create_author(&self, params: AuthorCreate) -> Author {
        let mut author = Author::new(params.name, params.email);
        author.id = self.next_id();
        debug!(author_id = author.id, "Author created");
        write(&self.authors).insert(author.id, author.clone());
        author
    }

    /// Stores a post.
    ///
    /// # Errors
    /// [`BlogError::NotFound`] if the author does not exist.
    pub fn create_post(&self, params: PostCreate) -> Result<Post, BlogError> {
        if self.author(params.author_id).is_none() {
            return Err(BlogError::not_found("Author", params.author_id));
        }

        let post = Post {
            id: self.next_id(),
            author_id: params.author_id,
            title: params.title,
            body: params.body,
            published: params.published,
        };
        debug!(post_id = post.id, author_id = post.author_id, "Post created");
        write(&self.posts).insert(post.id, post.clone());
        Ok(post)
    }

    /// Stores a comment.
    ///
    /// # Errors
    /// [`BlogError::NotFound`] if the post or the author does not exist.
    pub fn create_comment(&self, params: CommentCreate) -> Result<Comment, BlogError> {
        if self.post(params.post_id).is_none() {
            return Err(BlogError::not_found("Post", params.post_id));
        }
        if self.author(params.author_id).is_none() {
            return Err(BlogError::not_found("Author", params.author_id));
        }

        let comment = Comment {
            id: self.next_id(),
            post_id: params.post_id,
            author_id: params.author_id,
            body: params.body,
        };
        debug!(comment_id = comment.id, post_id = comment.post_id, "Comment created");
        write(&self.comments).insert(comment.id, comment.clone());
        Ok(comment)
    }

    pub fn author(&self, id: u64) -> Option<Author> {
        read(&self.authors).get(&id).cloned()
    }

    pub fn post(&self, id: u64) -> Option<Post> {
        read(&self.posts).get(&id).cloned()
    }

    pub fn post_count(&self) -> usize {
        read(&self.posts).len()
    }

    /// One page of posts, 1-based. Pages past the end, including offsets
    /// too large to compute, are empty.
    pub fn posts_page(&self, page: usize, per_page: usize) -> Vec<Post> {
        let Some(offset) = page.saturating_sub(1).checked_mul(per_page) else {
            return Vec::new();
        };
        read(&self.posts)
            .values()
            .skip(offset)
            .take(per_page)
            .cloned()
            .collect()
    }

    pub fn posts_by(&self, author_id: u64) -> Vec<Post> {
        read(&self.posts)
            .values()
            .filter(|post| post.author_id == author_id)
            .cloned()
            .collect()
    }

    pub fn comments_on(&self, post_id: u64) -> Vec<Comment> {
        read(&self.comments)
            .values()
            .filter(|comment| comment.post_id == post_id)
            .cloned()
            .collect()
    }
}

impl Default for BlogStore {
    fn default() -> Self {
        Self::new()
    }
}

fn read<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
