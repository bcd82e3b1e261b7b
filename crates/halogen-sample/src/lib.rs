//! # Halogen Sample Library
//!
//! A small blog rendered as HAL+JSON with `halogen`. The modules are exposed
//! for the binary and for integration testing.

pub mod author_representer;
pub mod comment_representer;
pub mod curies;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod post_representer;

pub use error::BlogError;
