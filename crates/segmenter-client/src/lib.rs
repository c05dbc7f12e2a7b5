//! Client boundary to the external segmentation backend
//!
//! The backend is a separate service that proposes candidate masks for a
//! sprite; everything downstream of it (filtering, labeling, previews) is
//! local. [`MaskGenerator`] is the seam: the HTTP implementation talks to
//! the real service, tests substitute their own.
//!
//! # Example
//!
//! ```no_run
//! use image::RgbaImage;
//! use sprite_parts_segmenter::{HttpMaskGenerator, MaskGenerator, SegmentationParams};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let generator = HttpMaskGenerator::new("http://127.0.0.1:8901");
//! let image = RgbaImage::new(64, 64);
//! let masks = generator.generate(&image, &SegmentationParams::default()).await?;
//! println!("{} candidate masks", masks.len());
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};
use sprite_parts_common::{Mask, ProcessingError};
use std::io::Cursor;
use thiserror::Error;
use tracing::{debug, info};

/// Segmentation client errors
#[derive(Debug, Error)]
pub enum SegmenterError {
    #[error("Invalid segmentation parameter: {0}")]
    InvalidParams(String),

    #[error("Segmentation request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Segmentation backend returned status {0}")]
    Status(u16),

    #[error("Failed to encode source image: {0}")]
    ImageEncode(String),

    #[error("Failed to decode candidate mask: {0}")]
    MaskDecode(String),
}

impl From<SegmenterError> for ProcessingError {
    fn from(err: SegmenterError) -> Self {
        ProcessingError::SegmenterError(err.to_string())
    }
}

/// Parameters forwarded to the segmentation backend
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentationParams {
    /// Sampling grid density per image side
    pub points_per_side: u32,
    /// Predicted IoU threshold for accepting a proposal
    pub pred_iou_thresh: f32,
    /// Stability score threshold for accepting a proposal
    pub stability_score_thresh: f32,
    /// Run the backend's mask-to-mask refinement pass
    pub use_m2m: bool,
}

impl Default for SegmentationParams {
    fn default() -> Self {
        Self {
            points_per_side: 32,
            pred_iou_thresh: 0.8,
            stability_score_thresh: 0.95,
            use_m2m: true,
        }
    }
}

impl SegmentationParams {
    /// Validate parameter ranges
    pub fn validate(&self) -> Result<(), SegmenterError> {
        if !(8..=128).contains(&self.points_per_side) {
            return Err(SegmenterError::InvalidParams(format!(
                "points_per_side must be between 8 and 128, got {}",
                self.points_per_side
            )));
        }
        if !(0.0..=1.0).contains(&self.pred_iou_thresh) {
            return Err(SegmenterError::InvalidParams(format!(
                "pred_iou_thresh must be between 0 and 1, got {}",
                self.pred_iou_thresh
            )));
        }
        if !(0.0..=1.0).contains(&self.stability_score_thresh) {
            return Err(SegmenterError::InvalidParams(format!(
                "stability_score_thresh must be between 0 and 1, got {}",
                self.stability_score_thresh
            )));
        }
        Ok(())
    }
}

/// Produces candidate masks for a sprite image
#[async_trait]
pub trait MaskGenerator: Send + Sync {
    /// Generate raw candidate masks for `image`
    async fn generate(
        &self,
        image: &RgbaImage,
        params: &SegmentationParams,
    ) -> Result<Vec<Mask>, SegmenterError>;
}

#[derive(Debug, Serialize)]
struct MaskRequest {
    image: String,
    points_per_side: u32,
    pred_iou_thresh: f32,
    stability_score_thresh: f32,
    use_m2m: bool,
}

#[derive(Debug, Deserialize)]
struct MaskResponse {
    masks: Vec<String>,
}

/// HTTP client for the segmentation backend
///
/// Sends the sprite as a base64 PNG to `{base_url}/masks` and decodes the
/// returned base64 PNG masks.
pub struct HttpMaskGenerator {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMaskGenerator {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl MaskGenerator for HttpMaskGenerator {
    async fn generate(
        &self,
        image: &RgbaImage,
        params: &SegmentationParams,
    ) -> Result<Vec<Mask>, SegmenterError> {
        params.validate()?;

        let png = encode_rgba_png(image)?;
        let request = MaskRequest {
            image: STANDARD.encode(&png),
            points_per_side: params.points_per_side,
            pred_iou_thresh: params.pred_iou_thresh,
            stability_score_thresh: params.stability_score_thresh,
            use_m2m: params.use_m2m,
        };

        debug!(
            "requesting masks from {} ({} byte source image)",
            self.base_url,
            png.len()
        );
        let response = self
            .client
            .post(format!("{}/masks", self.base_url))
            .json(&request)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(SegmenterError::Status(response.status().as_u16()));
        }
        let payload: MaskResponse = response.json().await?;

        let mut masks = Vec::with_capacity(payload.masks.len());
        for encoded in &payload.masks {
            masks.push(decode_mask_payload(encoded)?);
        }
        info!("segmentation backend returned {} candidate masks", masks.len());
        Ok(masks)
    }
}

/// Decode one base64 PNG mask; pixels with luma at or above 128 are set
pub fn decode_mask_payload(encoded: &str) -> Result<Mask, SegmenterError> {
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| SegmenterError::MaskDecode(format!("invalid base64: {}", e)))?;
    let gray = image::load_from_memory(&bytes)
        .map_err(|e| SegmenterError::MaskDecode(format!("invalid PNG: {}", e)))?
        .to_luma8();
    Ok(Mask::from_luma(&gray, 128))
}

fn encode_rgba_png(image: &RgbaImage) -> Result<Vec<u8>, SegmenterError> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| SegmenterError::ImageEncode(e.to_string()))?;
    Ok(buffer.into_inner())
}
