//! # Author Representer
//!
//! Renders an [`Author`] as a HAL resource. The email address is private and
//! only included when the render options carry a truthy `private` flag.
//!
//! ```json
//! {
//!   "id": 1,
//!   "name": "Alice",
//!   "_links": {
//!     "self": { "href": "/authors/1" },
//!     "posts": { "href": "/authors/1/posts" }
//!   }
//! }
//! ```

use halogen::{Configuration, DefinitionOptions, Representer, Result};
use serde_json::{json, Value};

use crate::model::Author;

/// Creates the Author representer.
pub fn new(config: &Configuration) -> Result<Representer<Author>> {
    let mut representer = Representer::<Author>::with_config(config);
    representer.resource("author")?;

    representer.method("show_email", |author| {
        Ok(author.options().get("private").cloned().unwrap_or(Value::Null))
    });

    representer.property("id", DefinitionOptions::new())?;
    representer.property("name", DefinitionOptions::new())?;
    representer.property("email", DefinitionOptions::new().when("show_email"))?;

    representer.link_with("self", &[], DefinitionOptions::new(), |author| {
        Ok(json!(format!("/authors/{}", author.resource()?.id)))
    })?;
    representer.link_with("posts", &[], DefinitionOptions::new(), |author| {
        Ok(json!(format!("/authors/{}/posts", author.resource()?.id)))
    })?;

    Ok(representer)
}
