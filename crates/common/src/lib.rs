//! Shared data model for the sprite-parts pipeline
//!
//! Provides the dense boolean [`Mask`] every stage operates on, the
//! [`BoundingBox`] geometry type, the [`PartLabel`] vocabulary and the
//! shared [`ProcessingError`] type.

pub mod label;
pub mod mask;

use thiserror::Error;

pub use label::PartLabel;
pub use mask::{BoundingBox, Mask};

/// Processing errors
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("Image processing error: {0}")]
    ImageError(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),

    #[error("Segmentation backend error: {0}")]
    SegmenterError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<image::ImageError> for ProcessingError {
    fn from(err: image::ImageError) -> Self {
        ProcessingError::ImageError(err.to_string())
    }
}

/// Result type for processing operations
pub type Result<T> = std::result::Result<T, ProcessingError>;
