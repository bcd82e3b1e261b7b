//! # Halogen Errors
//!
//! This module defines the error type shared by the declaration API and the
//! render engine. Declaration problems (`InvalidDefinition`, `InvalidResource`)
//! surface when a representer is built; everything else surfaces from a render
//! call and aborts it.

use thiserror::Error;

/// Errors that can occur while declaring or rendering a representer.
#[derive(Debug, Error)]
pub enum HalogenError {
    /// A definition failed validation and was not registered.
    #[error("Invalid definition: {0}")]
    InvalidDefinition(String),

    /// The resource and collection capabilities were mixed on one representer.
    #[error("Invalid resource: {0}")]
    InvalidResource(String),

    /// A required argument (usually the domain object) was not supplied.
    #[error("Missing argument: {0}")]
    MissingArgument(String),

    /// Render options were not a JSON object.
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// A named method or resource field could not be resolved.
    #[error("Undefined method `{name}` for {representer}")]
    UndefinedMethod { representer: String, name: String },

    /// Embedded resources nested deeper than the configured maximum.
    #[error("Embedding {representer} at depth {depth} exceeds the maximum depth of {max_depth}")]
    RecursiveEmbed {
        representer: String,
        depth: usize,
        max_depth: usize,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Raised by caller-supplied procedures.
    #[error("{0}")]
    Custom(String),
}

impl From<String> for HalogenError {
    fn from(msg: String) -> Self {
        HalogenError::Custom(msg)
    }
}

impl From<&str> for HalogenError {
    fn from(msg: &str) -> Self {
        HalogenError::Custom(msg.to_owned())
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = HalogenError> = std::result::Result<T, E>;
