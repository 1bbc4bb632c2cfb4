//! Failures of individual viewer operations
//!
//! None of these end the session; each is scoped to the action that raised
//! it and ends up in the status line.

use thiserror::Error;

use crate::catalog::{CatalogId, ValidationError};

#[derive(Debug, Error)]
pub enum ViewerError {
    /// Bad id or resolution input; state is left untouched
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Every metadata source failed, so auto background is off
    #[error("metadata not loaded, auto background is unavailable")]
    MetadataUnavailable,

    /// Metadata is loaded but has no usable body color for this id
    #[error("no background color found for #{0}")]
    BackgroundNotFound(CatalogId),

    /// The sprite could not be fetched or decoded
    #[error("sprite unavailable: {0}")]
    SpriteUnavailable(String),

    /// No drawable surface could be set up for the requested output
    #[error("rendering unsupported: {0}")]
    RenderUnsupported(String),

    /// The composited image could not be encoded
    #[error("image generation failed: {0}")]
    EncodeFailed(String),

    /// The finished file could not be written
    #[error("failed to save image: {0}")]
    Io(#[from] std::io::Error),
}

impl ViewerError {
    pub fn sprite_unavailable(msg: impl Into<String>) -> Self {
        Self::SpriteUnavailable(msg.into())
    }

    pub fn render_unsupported(msg: impl Into<String>) -> Self {
        Self::RenderUnsupported(msg.into())
    }

    pub fn encode_failed(msg: impl Into<String>) -> Self {
        Self::EncodeFailed(msg.into())
    }

    /// Whether the next compositing tier should be tried after this failure.
    pub fn allows_degradation(&self) -> bool {
        matches!(self, Self::SpriteUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_distinguish_background_failures() {
        let unavailable = ViewerError::MetadataUnavailable.to_string();
        let missing = ViewerError::BackgroundNotFound(CatalogId::new(42).unwrap()).to_string();
        assert_ne!(unavailable, missing);
        assert!(missing.contains("#42"));
    }

    #[test]
    fn test_validation_is_transparent() {
        let err = ViewerError::from(ValidationError::IdOutOfRange(10001));
        assert_eq!(err.to_string(), ValidationError::IdOutOfRange(10001).to_string());
    }

    #[test]
    fn test_only_sprite_failures_degrade() {
        assert!(ViewerError::sprite_unavailable("404").allows_degradation());
        assert!(!ViewerError::render_unsupported("0px").allows_degradation());
        assert!(!ViewerError::encode_failed("empty").allows_degradation());
        assert!(!ViewerError::MetadataUnavailable.allows_degradation());
    }
}
