//! # Blog Domain
//!
//! Plain data structures rendered by the representers, plus the in-memory
//! [`BlogStore`] the embed procedures look related records up in. Every model
//! derives `Serialize`, which is what lets a resource representer read its
//! fields by name.

pub mod author;
pub mod comment;
pub mod post;
pub mod store;

pub use author::*;
pub use comment::*;
pub use post::*;
pub use store::*;
