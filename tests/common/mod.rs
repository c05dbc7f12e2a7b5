//! Shared fixtures and output validators for workspace-level pipeline tests

#![allow(dead_code)]

use image::{Rgba, RgbaImage};
use serde_json::Value;

use sprite_parts_common::Mask;

pub const SPRITE_WIDTH: u32 = 64;
pub const SPRITE_HEIGHT: u32 = 96;

/// Body blocks of the test humanoid as half-open `(x0, y0, x1, y1)` windows:
/// head, torso, left arm, right arm, left leg, right leg.
pub const HUMANOID_BLOCKS: [(u32, u32, u32, u32); 6] = [
    (24, 8, 40, 24),
    (20, 24, 44, 60),
    (8, 28, 18, 52),
    (46, 28, 56, 52),
    (20, 60, 30, 88),
    (34, 60, 44, 88),
];

/// Humanoid sprite on a transparent background
pub fn humanoid_sprite() -> RgbaImage {
    let mut image = RgbaImage::from_pixel(SPRITE_WIDTH, SPRITE_HEIGHT, Rgba([0, 0, 0, 0]));
    for &(x0, y0, x1, y1) in &HUMANOID_BLOCKS {
        for y in y0..y1 {
            for x in x0..x1 {
                image.put_pixel(x, y, Rgba([150, 100, 82, 255]));
            }
        }
    }
    image
}

/// One candidate mask per humanoid block
pub fn humanoid_candidates() -> Vec<Mask> {
    HUMANOID_BLOCKS
        .iter()
        .map(|&(x0, y0, x1, y1)| Mask::from_window(SPRITE_WIDTH, SPRITE_HEIGHT, x0, y0, x1, y1))
        .collect()
}

#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn error(&mut self, msg: String) {
        self.errors.push(msg);
    }

    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate the JSON shape of a part summary
pub fn validate_part_summary(summary: &Value) -> ValidationResult {
    let mut result = ValidationResult::default();
    validate_summary_geometry(summary, &mut result);

    match summary.get("label").and_then(Value::as_str) {
        Some(label) => {
            let known = [
                "head",
                "torso",
                "left_arm",
                "right_arm",
                "left_leg",
                "right_leg",
                "weapon_or_accessory",
                "other",
            ];
            if !known.contains(&label) {
                result.error(format!("unknown part label: {label}"));
            }
        }
        None => result.error("missing label".to_string()),
    }

    result
}

/// Validate the JSON shape of a region summary
pub fn validate_region_summary(summary: &Value) -> ValidationResult {
    let mut result = ValidationResult::default();
    validate_summary_geometry(summary, &mut result);

    match summary.get("id").and_then(Value::as_str) {
        Some(id) if id.starts_with("region_") && id.len() == "region_00".len() => {}
        Some(id) => result.error(format!("malformed region id: {id}")),
        None => result.error("missing region id".to_string()),
    }
    if summary.get("suggested_label").and_then(Value::as_str).is_none() {
        result.error("missing suggested_label".to_string());
    }

    result
}

fn validate_summary_geometry(summary: &Value, result: &mut ValidationResult) {
    match summary.get("area").and_then(Value::as_u64) {
        Some(0) | None => result.error("area must be a positive integer".to_string()),
        Some(_) => {}
    }

    match summary.get("area_ratio").and_then(Value::as_f64) {
        Some(ratio) if (0.0..=1.0).contains(&ratio) => {}
        Some(ratio) => result.error(format!("area_ratio out of range: {ratio}")),
        None => result.error("missing area_ratio".to_string()),
    }

    match summary.get("bbox").and_then(Value::as_array) {
        Some(bbox) if bbox.len() == 4 => {
            if bbox.iter().any(|v| v.as_u64().is_none()) {
                result.error("bbox entries must be unsigned integers".to_string());
            }
        }
        _ => result.error("bbox must be a 4-element array".to_string()),
    }

    match summary.get("centroid").and_then(Value::as_array) {
        Some(centroid) if centroid.len() == 2 => {
            for value in centroid {
                match value.as_f64() {
                    // Centroids are reported with two decimal places
                    Some(v) if ((v * 100.0).round() - v * 100.0).abs() < 1e-9 => {}
                    Some(v) => result.error(format!("centroid not rounded to 2 decimals: {v}")),
                    None => result.error("centroid entries must be numbers".to_string()),
                }
            }
        }
        _ => result.error("centroid must be a 2-element array".to_string()),
    }

    match summary.get("color").and_then(Value::as_str) {
        Some(color) if color.starts_with("rgb(") && color.ends_with(')') => {}
        _ => result.error("color must be an rgb(...) string".to_string()),
    }
}
