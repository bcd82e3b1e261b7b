//! # Halogen
//!
//! Declarative HAL+JSON representers. For each domain type you declare, once,
//! which properties, links and embedded resources its representation has and
//! under which conditions; any value of that type then renders to a
//! `serde_json::Value` with the HAL `_links` and `_embedded` sections.
//!
//! ## Architecture Overview
//!
//! 1. **Declaration** ([`Representer`]) - properties, links, embeds, named
//!    methods and the resource / collection capability for one domain type.
//! 2. **Rules** ([`Definition`], [`Definitions`]) - each declaration becomes an
//!    immutable definition kept in declaration order.
//! 3. **Rendering** ([`Representer::render`]) - walks the definitions for one
//!    [`Instance`], evaluating guards and values, and recurses into embeds.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use halogen::{DefinitionOptions, Embedded, Options, Representer};
//! use serde::Serialize;
//! use serde_json::json;
//!
//! #[derive(Clone, Serialize)]
//! struct Comment {
//!     id: u32,
//!     body: String,
//! }
//!
//! #[derive(Serialize)]
//! struct Post {
//!     id: u32,
//!     title: String,
//!     comments: Vec<Comment>,
//! }
//!
//! # fn main() -> halogen::Result<()> {
//! let mut comment = Representer::<Comment>::new();
//! comment.resource("comment")?;
//! comment.property("body", DefinitionOptions::new())?;
//! let comment = Arc::new(comment);
//!
//! let mut post = Representer::<Post>::new();
//! post.resource("post")?;
//! post.property("title", DefinitionOptions::new())?;
//! post.link_with("self", &[], DefinitionOptions::new(), |post| {
//!     Ok(json!(format!("/posts/{}", post.resource()?.id)))
//! })?;
//! post.embed("comments", DefinitionOptions::new(), move |post| {
//!     Ok(Embedded::resources(&comment, post.resource()?.comments.clone()))
//! })?;
//!
//! let hello = Post {
//!     id: 1,
//!     title: "Hello".into(),
//!     comments: vec![Comment { id: 7, body: "First!".into() }],
//! };
//!
//! // Embeds are opt-in per render.
//! let rendered = post.render(&hello, Options::new().embed(["comments"]))?;
//! assert_eq!(
//!     rendered,
//!     json!({
//!         "title": "Hello",
//!         "_links": { "self": { "href": "/posts/1" } },
//!         "_embedded": { "comments": [{ "body": "First!" }] }
//!     })
//! );
//!
//! let plain = post.render(&hello, Options::new())?;
//! assert!(plain.get("_embedded").is_none());
//! # Ok(())
//! # }
//! ```
//!
//! ## Conditions
//!
//! Every definition accepts an `if` ([`DefinitionOptions::when`]) or `unless`
//! guard: a literal, a closure, or the name of a method declared with
//! [`Representer::method`]. Only `null` and `false` count as false.
//!
//! ## Concurrency
//!
//! Declaration happens at setup. Afterwards a representer is read-only and
//! can be shared through an `Arc` by concurrent renders; each render builds
//! its own [`Instance`] and output.

pub mod config;
pub mod definition;
pub mod definitions;
pub mod embed;
pub mod error;
pub mod instance;
pub mod options;
pub mod render;
pub mod representer;
pub mod tracing;

pub use config::{config, configure, Capabilities, Configuration, Extension, DEFAULT_MAX_DEPTH};
pub use definition::{truthy, Condition, Definition, DefinitionOptions, Guard, Kind, Procedure};
pub use definitions::Definitions;
pub use embed::{EmbedTarget, Embedded};
pub use error::{HalogenError, Result};
pub use instance::{Instance, Scope};
pub use options::Options;
pub use render::{EMBEDDED_KEY, LINKS_KEY};
pub use representer::Representer;
