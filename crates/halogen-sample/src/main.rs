//! # Halogen Sample
//!
//! Seeds an in-memory blog and prints a few HAL documents:
//!
//! 1. the API root, carrying the `curies` link installed by [`Curies`];
//! 2. a post with its author and comments embedded;
//! 3. the first page of the posts collection.
//!
//! ```bash
//! RUST_LOG=debug cargo run -p halogen-sample
//! ```

use std::sync::Arc;

use halogen::tracing::setup_tracing;
use halogen_sample::curies::Curies;
use halogen_sample::lifecycle::BlogApi;
use halogen_sample::model::{AuthorCreate, BlogStore, CommentCreate, PostCreate};
use halogen_sample::BlogError;
use tracing::{info, info_span};

fn main() -> Result<(), BlogError> {
    setup_tracing();

    info!("Starting halogen sample");

    // Extensions only reach representers created after this point.
    halogen::configure(|config| {
        config.extension(Curies::new("blog", "https://example.com/docs/rels/{rel}"));
    });

    let store = Arc::new(BlogStore::new());
    let (post_id, posts) = {
        let _span = info_span!("seed").entered();

        let alice = store.create_author(AuthorCreate {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
        });
        let bob = store.create_author(AuthorCreate {
            name: "Bob".to_string(),
            email: "bob@example.com".to_string(),
        });

        let hello = store.create_post(PostCreate {
            author_id: alice.id,
            title: "Hello, HAL".to_string(),
            body: "Links and embedded resources in one document.".to_string(),
            published: true,
        })?;
        store.create_post(PostCreate {
            author_id: bob.id,
            title: "Draft notes".to_string(),
            body: String::new(),
            published: false,
        })?;
        store.create_comment(CommentCreate {
            post_id: hello.id,
            author_id: bob.id,
            body: "Nice write-up!".to_string(),
        })?;

        info!(posts = store.post_count(), "Store seeded");
        (hello.id, store.post_count())
    };

    let api = BlogApi::new(Arc::clone(&store), &halogen::config())?;

    print("GET /", &api.root()?)?;
    print(
        &format!("GET /posts/{post_id}?embed=author,comments.author"),
        &api.post(post_id, "author,comments.author")?,
    )?;
    print("GET /posts?page=1&per_page=10", &api.posts(1, 10, "")?)?;

    info!(posts, "Application completed successfully");
    Ok(())
}

fn print(request: &str, document: &serde_json::Value) -> Result<(), BlogError> {
    let pretty = serde_json::to_string_pretty(document).map_err(halogen::HalogenError::from)?;
    println!("{request}\n{pretty}\n");
    Ok(())
}
