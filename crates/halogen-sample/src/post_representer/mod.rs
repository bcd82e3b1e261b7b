//! # Post Representer
//!
//! Renders a [`Post`] and its related records, plus a paginated collection of
//! posts.
//!
//! ## Resource
//!
//! - properties `id`, `title`, `body` read from the post; `comment_count` is
//!   computed from the store
//! - links `self`, `author`, `comments`, and `publish` for drafts only
//! - embeds `author` and `comments`, opt-in with `?embed=author,comments`
//!
//! ## Collection
//!
//! [`collection`] wraps one page of posts. Pagination reads the `page` and
//! `per_page` render options; `prev` and `next` are left out on the first and
//! last page.

use std::sync::Arc;

use halogen::{Configuration, DefinitionOptions, Embedded, Instance, Representer, Result};
use serde_json::{json, Value};

use crate::model::{Author, BlogStore, Comment, Post};

pub const DEFAULT_PER_PAGE: usize = 10;

/// Creates the Post representer.
pub fn new(
    config: &Configuration,
    store: Arc<BlogStore>,
    authors: Arc<Representer<Author>>,
    comments: Arc<Representer<Comment>>,
) -> Result<Representer<Post>> {
    let mut representer = Representer::<Post>::with_config(config);
    representer.resource("post")?;

    representer.method("draft", |post| Ok(json!(!post.resource()?.published)));

    representer.property("id", DefinitionOptions::new())?;
    representer.property("title", DefinitionOptions::new())?;
    representer.property("body", DefinitionOptions::new())?;

    let counts = Arc::clone(&store);
    representer.property_with("comment_count", DefinitionOptions::new(), move |post| {
        Ok(json!(counts.comments_on(post.resource()?.id).len()))
    })?;

    representer.link_with("self", &[], DefinitionOptions::new(), |post| {
        Ok(json!(format!("/posts/{}", post.resource()?.id)))
    })?;
    representer.link_with("author", &[], DefinitionOptions::new(), |post| {
        Ok(json!(format!("/authors/{}", post.resource()?.author_id)))
    })?;
    representer.link_with("comments", &[], DefinitionOptions::new(), |post| {
        Ok(json!(format!("/posts/{}/comments", post.resource()?.id)))
    })?;
    representer.link_with(
        "publish",
        &[],
        DefinitionOptions::new().when("draft").attr("method", "POST"),
        |post| Ok(json!(format!("/posts/{}/publish", post.resource()?.id))),
    )?;

    let lookup = Arc::clone(&store);
    representer.embed("author", DefinitionOptions::new(), move |post| {
        let author = lookup.author(post.resource()?.author_id);
        Ok(Embedded::optional(&authors, author))
    })?;
    representer.embed("comments", DefinitionOptions::new(), move |post| {
        Ok(Embedded::resources(&comments, store.comments_on(post.resource()?.id)))
    })?;

    Ok(representer)
}

/// Creates the representer for one page of posts, rendering each item with
/// `posts`.
pub fn collection(
    config: &Configuration,
    store: Arc<BlogStore>,
    posts: Arc<Representer<Post>>,
) -> Result<Representer<Vec<Post>>> {
    let mut representer = Representer::<Vec<Post>>::with_config(config);
    representer.collection("posts", posts)?;

    representer.property_with("page", DefinitionOptions::new(), |page| {
        Ok(json!(page_number(page)))
    })?;
    representer.property_with("count", DefinitionOptions::new(), |page| {
        Ok(json!(page.resource()?.len()))
    })?;
    let totals = Arc::clone(&store);
    representer.property_with("total", DefinitionOptions::new(), move |_| {
        Ok(json!(totals.post_count()))
    })?;

    representer.link_with("self", &[], DefinitionOptions::new(), |page| {
        Ok(page_href(page_number(page), per_page(page)))
    })?;
    representer.link_with("prev", &[], DefinitionOptions::new(), |page| {
        match page_number(page) {
            1 => Ok(Value::Null),
            n => Ok(page_href(n - 1, per_page(page))),
        }
    })?;
    representer.link_with("next", &[], DefinitionOptions::new(), move |page| {
        let (number, size) = (page_number(page), per_page(page));
        match number.checked_mul(size) {
            Some(seen) if seen < store.post_count() => Ok(page_href(number + 1, size)),
            _ => Ok(Value::Null),
        }
    })?;
    representer.link("find", &["templated"], DefinitionOptions::new().value("/posts{/id}"))?;

    Ok(representer)
}

fn page_number(page: &Instance<'_, Vec<Post>>) -> usize {
    usize_option(page, "page").unwrap_or(1).max(1)
}

fn per_page(page: &Instance<'_, Vec<Post>>) -> usize {
    usize_option(page, "per_page")
        .unwrap_or(DEFAULT_PER_PAGE)
        .max(1)
}

fn usize_option(page: &Instance<'_, Vec<Post>>, key: &str) -> Option<usize> {
    page.options()
        .get(key)
        .and_then(Value::as_u64)
        .and_then(|n| usize::try_from(n).ok())
}

fn page_href(page: usize, per_page: usize) -> Value {
    json!(format!("/posts?page={page}&per_page={per_page}"))
}
