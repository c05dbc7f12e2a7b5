//! Geometric rule cascade assigning anatomical labels
//!
//! Positions are normalized into the character bounding box, so the rules
//! are resolution independent: a head is a compact region near the top, legs
//! sit low, arms hang off to the sides. The rules run in a fixed order and
//! the first one that fires wins.

use sprite_parts_common::{BoundingBox, Mask, PartLabel};

/// Geometric statistics of a region, normalized to the character silhouette
#[derive(Debug, Clone, Copy)]
pub struct RegionStats {
    /// Centroid x inside the character bounding box, 0 at the left edge
    pub nx: f64,
    /// Centroid y inside the character bounding box, 0 at the top edge
    pub ny: f64,
    /// Region area over character area
    pub area_ratio: f64,
    /// Region bounding-box width over character bounding-box width
    pub width_ratio: f64,
    /// Region bounding-box height over character bounding-box height
    pub height_ratio: f64,
}

impl RegionStats {
    /// Compute stats for a region, or `None` for degenerate inputs
    #[must_use]
    pub fn compute(
        mask: &Mask,
        character_bbox: &BoundingBox,
        character_area: usize,
    ) -> Option<RegionStats> {
        if character_area == 0 {
            return None;
        }
        let area = mask.area();
        if area == 0 {
            return None;
        }
        let bbox = mask.bounding_box()?;
        let (cx, cy) = mask.centroid()?;

        let char_w = f64::from(character_bbox.width.max(1));
        let char_h = f64::from(character_bbox.height.max(1));
        Some(RegionStats {
            nx: (cx - f64::from(character_bbox.x)) / char_w,
            ny: (cy - f64::from(character_bbox.y)) / char_h,
            area_ratio: area as f64 / character_area as f64,
            width_ratio: f64::from(bbox.width) / char_w,
            height_ratio: f64::from(bbox.height) / char_h,
        })
    }
}

type LabelRule = fn(&RegionStats) -> Option<PartLabel>;

/// Ordered rule cascade; the first rule that fires wins
const LABEL_RULES: [LabelRule; 8] = [
    dominant_blob,
    full_silhouette,
    top_head,
    central_torso,
    lower_legs,
    wide_flat_accessory,
    side_arms,
    low_centroid_legs,
];

/// Regions covering most of the character cannot be a single part
fn dominant_blob(s: &RegionStats) -> Option<PartLabel> {
    (s.area_ratio >= 0.68).then_some(PartLabel::Other)
}

/// Near full-frame boxes span the whole silhouette
fn full_silhouette(s: &RegionStats) -> Option<PartLabel> {
    (s.width_ratio >= 0.84 && s.height_ratio >= 0.84).then_some(PartLabel::Other)
}

/// Compact region near the top
fn top_head(s: &RegionStats) -> Option<PartLabel> {
    (s.ny < 0.28 && s.area_ratio <= 0.22).then_some(PartLabel::Head)
}

/// Sizeable region roughly centered in the mid body
fn central_torso(s: &RegionStats) -> Option<PartLabel> {
    (s.area_ratio >= 0.08
        && (0.24..=0.72).contains(&s.ny)
        && (s.nx - 0.5).abs() <= 0.24
        && (0.18..=0.74).contains(&s.width_ratio)
        && (0.22..=0.78).contains(&s.height_ratio))
    .then_some(PartLabel::Torso)
}

/// Regions with a low centroid split into left and right legs
fn lower_legs(s: &RegionStats) -> Option<PartLabel> {
    (s.ny >= 0.58).then(|| split_side(s, PartLabel::LeftLeg, PartLabel::RightLeg))
}

/// Wide flat regions across the mid body read as held items
fn wide_flat_accessory(s: &RegionStats) -> Option<PartLabel> {
    (s.width_ratio >= 0.34 && s.height_ratio <= 0.24 && (0.25..=0.7).contains(&s.ny))
        .then_some(PartLabel::WeaponOrAccessory)
}

/// Mid-height regions clearly off center are arms
fn side_arms(s: &RegionStats) -> Option<PartLabel> {
    if !(0.2..=0.78).contains(&s.ny) {
        return None;
    }
    if s.nx < 0.45 {
        Some(PartLabel::LeftArm)
    } else if s.nx > 0.55 {
        Some(PartLabel::RightArm)
    } else {
        None
    }
}

/// Last resort for anything below the midline
fn low_centroid_legs(s: &RegionStats) -> Option<PartLabel> {
    (s.ny > 0.5).then(|| split_side(s, PartLabel::LeftLeg, PartLabel::RightLeg))
}

fn split_side(s: &RegionStats, left: PartLabel, right: PartLabel) -> PartLabel {
    if s.nx < 0.5 {
        left
    } else {
        right
    }
}

/// Label a region from its geometry relative to the character
#[must_use]
pub fn classify_region(
    mask: &Mask,
    character_bbox: &BoundingBox,
    character_area: usize,
) -> PartLabel {
    match RegionStats::compute(mask, character_bbox, character_area) {
        Some(stats) => classify_stats(&stats),
        None => PartLabel::Other,
    }
}

/// Run the rule cascade over precomputed stats
#[must_use]
pub fn classify_stats(stats: &RegionStats) -> PartLabel {
    LABEL_RULES
        .iter()
        .find_map(|rule| rule(stats))
        .unwrap_or(PartLabel::Other)
}
