//! # API Wiring
//!
//! Representers reference each other (posts embed authors and comments,
//! comments embed authors), so they are built bottom-up and shared through
//! `Arc`s. [`BlogApi`] owns the finished set and exposes one render call per
//! endpoint of the blog API.
//!
//! ## Setup Order
//!
//! 1. **Configuration** - extensions are installed when a representer is
//!    created, so configure first.
//! 2. **Leaf representers** - [`author_representer`](crate::author_representer).
//! 3. **Dependent representers** - comments, then posts, then the posts
//!    collection.
//!
//! After [`BlogApi::new`] returns, nothing is declared anymore and the API can
//! be shared by concurrent requests.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use halogen::Configuration;
//! use halogen_sample::lifecycle::BlogApi;
//! use halogen_sample::model::{AuthorCreate, BlogStore};
//!
//! let store = Arc::new(BlogStore::new());
//! let alice = store.create_author(AuthorCreate {
//!     name: "Alice".to_string(),
//!     email: "alice@example.com".to_string(),
//! });
//!
//! let api = BlogApi::new(Arc::clone(&store), &Configuration::new()).unwrap();
//! let rendered = api.author(alice.id, false).unwrap();
//! assert_eq!(rendered["name"], "Alice");
//! ```

use std::sync::Arc;

use halogen::{Configuration, DefinitionOptions, Options, Representer};
use serde_json::Value;
use tracing::info;

use crate::error::BlogError;
use crate::model::{Author, BlogStore, Comment, Post};
use crate::{author_representer, comment_representer, post_representer};

/// The blog API: the store plus every representer rendering it.
pub struct BlogApi {
    store: Arc<BlogStore>,
    root: Representer<()>,
    authors: Arc<Representer<Author>>,
    comments: Arc<Representer<Comment>>,
    posts: Arc<Representer<Post>>,
    post_pages: Representer<Vec<Post>>,
}

impl BlogApi {
    /// Declares all representers with `config`.
    pub fn new(store: Arc<BlogStore>, config: &Configuration) -> halogen::Result<Self> {
        let authors = Arc::new(author_representer::new(config)?);
        let comments = Arc::new(comment_representer::new(
            config,
            Arc::clone(&store),
            Arc::clone(&authors),
        )?);
        let posts = Arc::new(post_representer::new(
            config,
            Arc::clone(&store),
            Arc::clone(&authors),
            Arc::clone(&comments),
        )?);
        let post_pages =
            post_representer::collection(config, Arc::clone(&store), Arc::clone(&posts))?;

        let mut root = Representer::<()>::with_config(config);
        root.link("self", &[], DefinitionOptions::new().value("/"))?;
        root.link("posts", &[], DefinitionOptions::new().value("/posts"))?;
        root.link(
            "author",
            &["templated"],
            DefinitionOptions::new().value("/authors{/id}"),
        )?;

        info!(config = ?config, "Blog API ready");

        Ok(Self {
            store,
            root,
            authors,
            comments,
            posts,
            post_pages,
        })
    }

    /// `GET /`
    #[tracing::instrument(skip(self))]
    pub fn root(&self) -> Result<Value, BlogError> {
        Ok(self.root.render_optional(None, Options::new())?)
    }

    /// `GET /authors/{id}`. `private` includes the email address.
    #[tracing::instrument(skip(self))]
    pub fn author(&self, id: u64, private: bool) -> Result<Value, BlogError> {
        let author = self
            .store
            .author(id)
            .ok_or_else(|| BlogError::not_found("Author", id))?;
        Ok(self
            .authors
            .render(&author, Options::new().with("private", private))?)
    }

    /// `GET /authors/{id}/posts?embed=...`
    #[tracing::instrument(skip(self))]
    pub fn author_posts(&self, author_id: u64, embed: &str) -> Result<Vec<Value>, BlogError> {
        if self.store.author(author_id).is_none() {
            return Err(BlogError::not_found("Author", author_id));
        }
        self.store
            .posts_by(author_id)
            .iter()
            .map(|post| -> Result<Value, BlogError> {
                Ok(self.posts.render(post, Options::new().embed_param(embed))?)
            })
            .collect()
    }

    /// `GET /posts/{id}?embed=...`
    #[tracing::instrument(skip(self))]
    pub fn post(&self, id: u64, embed: &str) -> Result<Value, BlogError> {
        let post = self
            .store
            .post(id)
            .ok_or_else(|| BlogError::not_found("Post", id))?;
        Ok(self.posts.render(&post, Options::new().embed_param(embed))?)
    }

    /// `GET /posts/{post_id}/comments`
    #[tracing::instrument(skip(self))]
    pub fn comments(&self, post_id: u64, embed: &str) -> Result<Vec<Value>, BlogError> {
        if self.store.post(post_id).is_none() {
            return Err(BlogError::not_found("Post", post_id));
        }
        self.store
            .comments_on(post_id)
            .iter()
            .map(|comment| -> Result<Value, BlogError> {
                Ok(self
                    .comments
                    .render(comment, Options::new().embed_param(embed))?)
            })
            .collect()
    }

    /// `GET /posts?page=..&per_page=..&embed=...`
    #[tracing::instrument(skip(self))]
    pub fn posts(&self, page: usize, per_page: usize, embed: &str) -> Result<Value, BlogError> {
        let items = self.store.posts_page(page, per_page);
        let options = Options::new()
            .with("page", page)
            .with("per_page", per_page)
            .embed_param(embed);
        Ok(self.post_pages.render(&items, options)?)
    }
}
