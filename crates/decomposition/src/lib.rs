//! Sprite part decomposition
//!
//! Turns a sprite image plus raw segmentation candidates into labeled
//! anatomical parts. The pipeline estimates the opaque foreground, filters
//! and deduplicates the candidate masks, labels every surviving region with
//! a geometric rule cascade, merges regions by label and runs a correction
//! pass over the result.
//!
//! # Features
//!
//! - Alpha-threshold foreground estimation with a flood-fill fallback for
//!   sprites flattened onto a solid backdrop
//! - NMS-style candidate deduplication by IoU and containment
//! - Resolution-independent geometric labeling (head, torso, arms, legs,
//!   accessories)
//! - Correction pass that rejects or reconstructs implausible torsos and
//!   suppresses dominant catch-all regions
//!
//! # Example
//!
//! ```no_run
//! use image::RgbaImage;
//! use sprite_parts_decomposition::{DecomposerConfig, PartDecomposer};
//!
//! let image = RgbaImage::new(64, 64);
//! let candidates = Vec::new(); // masks from the segmentation backend
//! let decomposer = PartDecomposer::new(DecomposerConfig::default());
//! let decomposition = decomposer.decompose(&image, candidates);
//! for part in &decomposition.merged_parts {
//!     println!("{}: {} px", part.label, part.mask.area());
//! }
//! ```

pub mod foreground;
pub mod labeling;
pub mod merge;
pub mod regions;

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use sprite_parts_common::{BoundingBox, Mask, PartLabel};
use tracing::{debug, info};

/// Configuration for part decomposition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecomposerConfig {
    /// Upper bound on regions kept per sprite
    pub max_regions: usize,
    /// Alpha value at or above which a pixel counts as opaque
    pub alpha_cutoff: u8,
    /// Per-channel tolerance when matching pixels against the corner
    /// background colors during flood fill
    pub background_tolerance: i32,
}

impl Default for DecomposerConfig {
    fn default() -> Self {
        Self {
            max_regions: 12,
            alpha_cutoff: 8,
            background_tolerance: 26,
        }
    }
}

/// A deduplicated region with its anatomical label
#[derive(Debug, Clone)]
pub struct LabeledRegion {
    pub label: PartLabel,
    pub mask: Mask,
}

/// Union of every region sharing one label
#[derive(Debug, Clone)]
pub struct MergedPart {
    pub label: PartLabel,
    pub mask: Mask,
}

/// Result of decomposing one sprite
#[derive(Debug, Clone)]
pub struct Decomposition {
    /// Union of the accepted regions, clipped to the opaque estimate
    pub character_mask: Mask,
    /// One entry per distinct label, in first-appearance order
    pub merged_parts: Vec<MergedPart>,
    /// Individual regions after labeling and corrections
    pub labeled_regions: Vec<LabeledRegion>,
}

impl Decomposition {
    fn empty(width: u32, height: u32) -> Self {
        Self {
            character_mask: Mask::new(width, height),
            merged_parts: Vec::new(),
            labeled_regions: Vec::new(),
        }
    }

    /// Merged mask for a label, when present
    #[must_use]
    pub fn part(&self, label: PartLabel) -> Option<&Mask> {
        self.merged_parts
            .iter()
            .find(|p| p.label == label)
            .map(|p| &p.mask)
    }
}

/// Union of all candidate masks matching the given dimensions
///
/// Used by the raw segmentation endpoint, which previews every candidate
/// before any filtering happens.
#[must_use]
pub fn combined_candidate_mask(candidates: &[Mask], width: u32, height: u32) -> Mask {
    let mut combined = Mask::new(width, height);
    for mask in candidates {
        if mask.matches_dimensions(width, height) {
            combined.union_with(mask);
        }
    }
    combined
}

/// Sprite part decomposition pipeline
pub struct PartDecomposer {
    config: DecomposerConfig,
}

impl PartDecomposer {
    #[must_use]
    pub fn new(config: DecomposerConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &DecomposerConfig {
        &self.config
    }

    /// Opaque-foreground estimate for a sprite
    #[must_use]
    pub fn estimate_opaque_mask(&self, image: &RgbaImage) -> Mask {
        foreground::estimate_opaque_mask(
            image,
            self.config.alpha_cutoff,
            self.config.background_tolerance,
        )
    }

    /// Decompose a sprite into labeled parts
    ///
    /// Estimates the opaque foreground from `image`, then runs the candidate
    /// masks through filtering, deduplication, labeling and correction.
    #[must_use]
    pub fn decompose(&self, image: &RgbaImage, candidates: Vec<Mask>) -> Decomposition {
        let opaque = self.estimate_opaque_mask(image);
        let (width, height) = image.dimensions();
        self.decompose_with_opaque(width, height, candidates, Some(&opaque))
    }

    /// Decompose with an externally supplied opaque mask
    ///
    /// An opaque mask with mismatched dimensions or no set pixels is ignored
    /// and the candidates are processed unclipped. Total over its inputs:
    /// degenerate candidates yield the opaque-mask fallback or an empty
    /// decomposition, never an error.
    #[must_use]
    pub fn decompose_with_opaque(
        &self,
        width: u32,
        height: u32,
        candidates: Vec<Mask>,
        opaque_mask: Option<&Mask>,
    ) -> Decomposition {
        let opaque =
            opaque_mask.filter(|m| m.matches_dimensions(width, height) && !m.is_empty());

        let total_candidates = candidates.len();
        let kept = regions::filter_candidates(candidates, width, height, opaque);
        debug!(
            "{} of {} candidate masks survived filtering",
            kept.len(),
            total_candidates
        );
        if kept.is_empty() {
            return fallback_decomposition(opaque, width, height);
        }

        let mut character_mask = Mask::new(width, height);
        for region in &kept {
            character_mask.union_with(region);
        }
        if let Some(opaque) = opaque {
            character_mask.intersect_with(opaque);
        }
        let character_area = character_mask.area();
        if character_area == 0 {
            return fallback_decomposition(opaque, width, height);
        }

        let min_area = regions::min_region_area(character_area);
        let mut selected = regions::select_regions(kept, min_area, self.config.max_regions);
        if selected.is_empty() {
            selected.push(character_mask.clone());
        }

        let character_bbox = character_mask
            .bounding_box()
            .unwrap_or_else(|| BoundingBox::new(0, 0, width, height));

        let labeled: Vec<LabeledRegion> = selected
            .iter()
            .map(|mask| LabeledRegion {
                label: labeling::classify_region(mask, &character_bbox, character_area),
                mask: mask.clone(),
            })
            .collect();

        let merged = merge::merge_by_label(&labeled);
        let (merged_parts, labeled_regions) = merge::apply_corrections(
            merged,
            labeled,
            &selected,
            &character_bbox,
            character_area,
            width,
            height,
        );

        info!(
            "decomposed sprite into {} parts from {} regions",
            merged_parts.len(),
            labeled_regions.len()
        );

        Decomposition {
            character_mask,
            merged_parts,
            labeled_regions,
        }
    }
}

/// Single catch-all region from the opaque mask, or an empty result when no
/// usable opaque mask exists
fn fallback_decomposition(opaque_mask: Option<&Mask>, width: u32, height: u32) -> Decomposition {
    match opaque_mask {
        Some(opaque) if !opaque.is_empty() => {
            debug!("no usable candidate regions, falling back to the opaque mask");
            Decomposition {
                character_mask: opaque.clone(),
                merged_parts: vec![MergedPart {
                    label: PartLabel::Other,
                    mask: opaque.clone(),
                }],
                labeled_regions: vec![LabeledRegion {
                    label: PartLabel::Other,
                    mask: opaque.clone(),
                }],
            }
        }
        _ => Decomposition::empty(width, height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DecomposerConfig::default();
        assert_eq!(config.max_regions, 12);
        assert_eq!(config.alpha_cutoff, 8);
        assert_eq!(config.background_tolerance, 26);
    }

    #[test]
    fn test_config_serde_round_trip() {
        let config = DecomposerConfig {
            max_regions: 6,
            alpha_cutoff: 16,
            background_tolerance: 30,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: DecomposerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.max_regions, 6);
        assert_eq!(back.alpha_cutoff, 16);
        assert_eq!(back.background_tolerance, 30);
    }

    #[test]
    fn test_combined_candidate_mask_skips_mismatched() {
        let a = Mask::from_fn(16, 16, |x, _| x < 4);
        let b = Mask::from_fn(16, 16, |x, _| x >= 12);
        let wrong = Mask::from_fn(8, 8, |_, _| true);

        let combined = combined_candidate_mask(&[a, b, wrong], 16, 16);
        assert_eq!(combined.area(), 128);
        assert!(combined.get(0, 0));
        assert!(combined.get(15, 15));
        assert!(!combined.get(8, 8));
    }

    #[test]
    fn test_part_lookup() {
        let decomposition = Decomposition {
            character_mask: Mask::new(8, 8),
            merged_parts: vec![MergedPart {
                label: PartLabel::Head,
                mask: Mask::from_fn(8, 8, |_, y| y < 2),
            }],
            labeled_regions: Vec::new(),
        };
        assert!(decomposition.part(PartLabel::Head).is_some());
        assert!(decomposition.part(PartLabel::Torso).is_none());
    }
}
