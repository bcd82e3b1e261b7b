//! # Comment Representer
//!
//! Renders a [`Comment`] with links back to its post, and its author as an
//! optional embed looked up in the [`BlogStore`].

use std::sync::Arc;

use halogen::{Configuration, DefinitionOptions, Embedded, Representer, Result};
use serde_json::json;

use crate::model::{Author, BlogStore, Comment};

/// Creates the Comment representer. `authors` renders the embedded author.
pub fn new(
    config: &Configuration,
    store: Arc<BlogStore>,
    authors: Arc<Representer<Author>>,
) -> Result<Representer<Comment>> {
    let mut representer = Representer::<Comment>::with_config(config);
    representer.resource("comment")?;

    representer.property("id", DefinitionOptions::new())?;
    representer.property("body", DefinitionOptions::new())?;

    representer.link_with("self", &[], DefinitionOptions::new(), |comment| {
        let comment = comment.resource()?;
        Ok(json!(format!("/posts/{}/comments/{}", comment.post_id, comment.id)))
    })?;
    representer.link_with("post", &[], DefinitionOptions::new(), |comment| {
        Ok(json!(format!("/posts/{}", comment.resource()?.post_id)))
    })?;

    representer.embed("author", DefinitionOptions::new(), move |comment| {
        let author = store.author(comment.resource()?.author_id);
        Ok(Embedded::optional(&authors, author))
    })?;

    Ok(representer)
}
