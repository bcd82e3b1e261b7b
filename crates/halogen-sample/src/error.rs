use halogen::HalogenError;
use thiserror::Error;

/// Errors surfaced by the blog API.
#[derive(Debug, Error)]
pub enum BlogError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u64 },

    #[error("Rendering failed: {0}")]
    Render(#[from] HalogenError),
}

impl BlogError {
    pub fn not_found(entity: &'static str, id: u64) -> Self {
        BlogError::NotFound { entity, id }
    }
}
