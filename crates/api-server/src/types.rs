//! API request and response types

use serde::{Deserialize, Serialize};

use sprite_parts_preview::{PartSummary, RegionSummary};
use sprite_parts_segmenter::SegmentationParams;

/// Raw segmentation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentRequest {
    /// Sprite image as a base64 data URL (`data:image/...;base64,...`)
    pub image: String,
    /// Sampling grid density for the segmentation backend
    #[serde(default = "default_points_per_side")]
    pub points_per_side: u32,
    /// Predicted IoU threshold for candidate masks
    #[serde(default = "default_pred_iou_thresh")]
    pub pred_iou_thresh: f32,
    /// Stability score threshold for candidate masks
    #[serde(default = "default_stability_score_thresh")]
    pub stability_score_thresh: f32,
    /// Whether the backend should run mask-to-mask refinement
    #[serde(default = "default_use_m2m")]
    pub use_m2m: bool,
}

/// Part decomposition request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartsRequest {
    /// Sprite image as a base64 data URL (`data:image/...;base64,...`)
    pub image: String,
    /// Sampling grid density for the segmentation backend
    #[serde(default = "default_points_per_side")]
    pub points_per_side: u32,
    /// Predicted IoU threshold for candidate masks
    #[serde(default = "default_pred_iou_thresh")]
    pub pred_iou_thresh: f32,
    /// Stability score threshold for candidate masks
    #[serde(default = "default_stability_score_thresh")]
    pub stability_score_thresh: f32,
    /// Whether the backend should run mask-to-mask refinement
    #[serde(default = "default_use_m2m")]
    pub use_m2m: bool,
    /// Cap on the number of regions kept after deduplication
    #[serde(default = "default_max_regions")]
    pub max_regions: usize,
}

fn default_points_per_side() -> u32 {
    32
}

fn default_pred_iou_thresh() -> f32 {
    0.8
}

fn default_stability_score_thresh() -> f32 {
    0.95
}

fn default_use_m2m() -> bool {
    true
}

fn default_max_regions() -> usize {
    12
}

impl SegmentRequest {
    /// Backend parameters carried by this request
    #[must_use]
    pub fn segmentation_params(&self) -> SegmentationParams {
        SegmentationParams {
            points_per_side: self.points_per_side,
            pred_iou_thresh: self.pred_iou_thresh,
            stability_score_thresh: self.stability_score_thresh,
            use_m2m: self.use_m2m,
        }
    }
}

impl PartsRequest {
    /// Backend parameters carried by this request
    #[must_use]
    pub fn segmentation_params(&self) -> SegmentationParams {
        SegmentationParams {
            points_per_side: self.points_per_side,
            pred_iou_thresh: self.pred_iou_thresh,
            stability_score_thresh: self.stability_score_thresh,
            use_m2m: self.use_m2m,
        }
    }

    /// Validate the region cap
    pub fn validate(&self) -> Result<(), String> {
        if !(4..=40).contains(&self.max_regions) {
            return Err(format!(
                "max_regions must be between 4 and 40, got {}",
                self.max_regions
            ));
        }
        Ok(())
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub version: String,
    /// Segmentation backend this server forwards to
    pub segmenter: String,
}

/// Part decomposition response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartsResponse {
    pub ok: bool,
    pub image_width: u32,
    pub image_height: u32,
    /// Number of merged parts (equals `parts.len()`)
    pub total_parts: usize,
    /// Merged-parts overlay as a PNG data URL
    pub preview: String,
    /// Individual-regions overlay as a PNG data URL
    pub regions_preview: String,
    /// Merged anatomical parts, largest first
    pub parts: Vec<PartSummary>,
    /// Deduplicated regions with suggested labels, largest first
    pub regions: Vec<RegionSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_request_defaults() {
        let request: SegmentRequest =
            serde_json::from_str(r#"{"image": "data:image/png;base64,AAAA"}"#)
                .expect("minimal request should deserialize");

        assert_eq!(request.points_per_side, 32);
        assert!((request.pred_iou_thresh - 0.8).abs() < 1e-6);
        assert!((request.stability_score_thresh - 0.95).abs() < 1e-6);
        assert!(request.use_m2m);
    }

    #[test]
    fn test_parts_request_defaults() {
        let request: PartsRequest =
            serde_json::from_str(r#"{"image": "data:image/png;base64,AAAA"}"#)
                .expect("minimal request should deserialize");

        assert_eq!(request.max_regions, 12);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_parts_request_overrides() {
        let request: PartsRequest = serde_json::from_str(
            r#"{
                "image": "data:image/png;base64,AAAA",
                "points_per_side": 16,
                "pred_iou_thresh": 0.5,
                "use_m2m": false,
                "max_regions": 8
            }"#,
        )
        .expect("request with overrides should deserialize");

        assert_eq!(request.points_per_side, 16);
        assert!((request.pred_iou_thresh - 0.5).abs() < 1e-6);
        assert!(!request.use_m2m);
        assert_eq!(request.max_regions, 8);

        let params = request.segmentation_params();
        assert_eq!(params.points_per_side, 16);
        assert!(!params.use_m2m);
    }

    #[test]
    fn test_parts_request_rejects_out_of_range_cap() {
        let low: PartsRequest =
            serde_json::from_str(r#"{"image": "data:x;base64,AA==", "max_regions": 3}"#)
                .expect("deserialization does not enforce bounds");
        assert!(low.validate().is_err());

        let high: PartsRequest =
            serde_json::from_str(r#"{"image": "data:x;base64,AA==", "max_regions": 41}"#)
                .expect("deserialization does not enforce bounds");
        assert!(high.validate().is_err());
    }

    #[test]
    fn test_parts_response_wire_format() {
        let response = PartsResponse {
            ok: true,
            image_width: 64,
            image_height: 96,
            total_parts: 0,
            preview: "data:image/png;base64,AAAA".to_string(),
            regions_preview: "data:image/png;base64,BBBB".to_string(),
            parts: Vec::new(),
            regions: Vec::new(),
        };

        let json = serde_json::to_value(&response).expect("response should serialize");
        assert_eq!(json["ok"], true);
        assert_eq!(json["image_width"], 64);
        assert_eq!(json["image_height"], 96);
        assert_eq!(json["total_parts"], 0);
        assert!(json["preview"].as_str().is_some());
        assert!(json["regions_preview"].as_str().is_some());
        assert!(json["parts"].as_array().is_some());
        assert!(json["regions"].as_array().is_some());
    }
}
