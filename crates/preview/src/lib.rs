//! Preview rendering for sprite part decompositions
//!
//! Composes alpha-blended overlays of part and region masks on top of the
//! source sprite and produces the geometry summaries the JSON API reports
//! alongside them.
//!
//! # Features
//!
//! - Per-label overlay colors for merged parts, rotating palette for
//!   individual regions
//! - Bounding-box and text annotations drawn with `imageproc`
//! - PNG and base64 data-URL encoding of previews and masks
//!
//! # Example
//!
//! ```no_run
//! use image::RgbaImage;
//! use sprite_parts_decomposition::{DecomposerConfig, PartDecomposer};
//! use sprite_parts_preview::{png_data_url, PreviewRenderer, RenderOptions};
//!
//! let image = RgbaImage::new(64, 64);
//! let decomposer = PartDecomposer::new(DecomposerConfig::default());
//! let decomposition = decomposer.decompose(&image, Vec::new());
//!
//! let renderer = PreviewRenderer::new(RenderOptions::default());
//! let (overlay, parts) =
//!     renderer.render_parts(&image, &decomposition.character_mask, &decomposition.merged_parts);
//! let url = png_data_url(&overlay).unwrap();
//! println!("{} parts, preview {} bytes", parts.len(), url.len());
//! ```

mod colors;
mod encode;
mod font;

pub use colors::{label_color, region_color, rgb_string};
pub use encode::{encode_png, mask_png, png_data_url};

use ab_glyph::PxScale;
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use serde::{Deserialize, Serialize};
use sprite_parts_common::{BoundingBox, Mask, PartLabel, ProcessingError};
use sprite_parts_decomposition::{LabeledRegion, MergedPart};
use thiserror::Error;

/// Preview rendering errors
#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("Failed to encode preview PNG: {0}")]
    Encode(String),
}

impl From<PreviewError> for ProcessingError {
    fn from(err: PreviewError) -> Self {
        ProcessingError::EncodingError(err.to_string())
    }
}

/// Options for preview rendering
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Blend factor for merged part overlays
    pub part_blend: f32,
    /// Blend factor for individual region overlays
    pub region_blend: f32,
    /// Outline thickness for bounding boxes
    pub line_thickness: u32,
    /// Font scale for overlay text
    pub font_scale: f32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            part_blend: 0.48,
            region_blend: 0.52,
            line_thickness: 2,
            font_scale: 14.0,
        }
    }
}

/// Geometry summary of one merged part
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartSummary {
    pub label: PartLabel,
    pub area: usize,
    pub area_ratio: f64,
    pub bbox: [u32; 4],
    pub centroid: [f64; 2],
    pub color: String,
}

/// Geometry summary of one individual region
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionSummary {
    pub id: String,
    pub suggested_label: PartLabel,
    pub area: usize,
    pub area_ratio: f64,
    pub bbox: [u32; 4],
    pub centroid: [f64; 2],
    pub color: String,
}

/// Renders decomposition previews and their geometry summaries
#[derive(Debug, Clone, Default)]
pub struct PreviewRenderer {
    options: RenderOptions,
}

impl PreviewRenderer {
    #[must_use]
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render the merged-parts overlay
    ///
    /// Blends each part over the source sprite, annotates bounding boxes and
    /// labels, and returns the summaries sorted by area descending. Empty
    /// parts are skipped.
    #[must_use]
    pub fn render_parts(
        &self,
        source: &RgbaImage,
        character_mask: &Mask,
        parts: &[MergedPart],
    ) -> (RgbaImage, Vec<PartSummary>) {
        let mut out = source.clone();
        let total_area = character_mask.area();

        let mut summaries = Vec::new();
        let mut annotations = Vec::new();
        for part in parts {
            let area = part.mask.area();
            if area == 0 {
                continue;
            }
            let (Some(bbox), Some((cx, cy))) = (part.mask.bounding_box(), part.mask.centroid())
            else {
                continue;
            };

            let color = label_color(part.label);
            blend_mask(&mut out, &part.mask, color, self.options.part_blend);

            annotations.push((bbox, color, part.label.display_name().to_string()));
            summaries.push(PartSummary {
                label: part.label,
                area,
                area_ratio: area as f64 / total_area.max(1) as f64,
                bbox: bbox.to_array(),
                centroid: [round2(cx), round2(cy)],
                color: rgb_string(color),
            });
        }

        self.draw_annotations(&mut out, &annotations);
        summaries.sort_by(|a, b| b.area.cmp(&a.area));
        (out, summaries)
    }

    /// Render the individual-regions overlay
    ///
    /// Region ids and palette colors follow the position in the input list,
    /// so `region_03` keeps its id even when earlier regions are empty or
    /// the summaries are reordered by area.
    #[must_use]
    pub fn render_regions(
        &self,
        source: &RgbaImage,
        character_mask: &Mask,
        regions: &[LabeledRegion],
    ) -> (RgbaImage, Vec<RegionSummary>) {
        let mut out = source.clone();
        let total_area = character_mask.area();

        let mut summaries = Vec::new();
        let mut annotations = Vec::new();
        for (index, region) in regions.iter().enumerate() {
            let area = region.mask.area();
            if area == 0 {
                continue;
            }
            let (Some(bbox), Some((cx, cy))) = (region.mask.bounding_box(), region.mask.centroid())
            else {
                continue;
            };

            let color = region_color(index);
            blend_mask(&mut out, &region.mask, color, self.options.region_blend);

            let id = format!("region_{:02}", index + 1);
            annotations.push((bbox, color, format!("{} ({})", id, region.label)));
            summaries.push(RegionSummary {
                id,
                suggested_label: region.label,
                area,
                area_ratio: area as f64 / total_area.max(1) as f64,
                bbox: bbox.to_array(),
                centroid: [round2(cx), round2(cy)],
                color: rgb_string(color),
            });
        }

        self.draw_annotations(&mut out, &annotations);
        summaries.sort_by(|a, b| b.area.cmp(&a.area));
        (out, summaries)
    }

    fn draw_annotations(&self, out: &mut RgbaImage, annotations: &[(BoundingBox, Rgba<u8>, String)]) {
        let font = font::system_font();
        let scale = PxScale::from(self.options.font_scale);

        for (bbox, color, text) in annotations {
            for t in 0..self.options.line_thickness {
                let inner_w = bbox.width.saturating_sub(2 * t);
                let inner_h = bbox.height.saturating_sub(2 * t);
                if inner_w > 0 && inner_h > 0 {
                    let rect =
                        Rect::at((bbox.x + t) as i32, (bbox.y + t) as i32).of_size(inner_w, inner_h);
                    draw_hollow_rect_mut(out, rect, *color);
                }
            }

            if let Some(font) = font {
                let text_x = (bbox.x + 2) as i32;
                let text_y = bbox.y.saturating_sub(14) as i32;
                draw_text_mut(out, *color, text_x, text_y, scale, font, text);
            }
        }
    }
}

/// Blend `color` over the masked pixels, leaving alpha untouched
fn blend_mask(out: &mut RgbaImage, mask: &Mask, color: Rgba<u8>, alpha: f32) {
    let (width, height) = out.dimensions();
    if !mask.matches_dimensions(width, height) {
        return;
    }
    for y in 0..height {
        for x in 0..width {
            if !mask.get(x, y) {
                continue;
            }
            let px = out.get_pixel_mut(x, y);
            for c in 0..3 {
                let blended = (1.0 - alpha) * f32::from(px[c]) + alpha * f32::from(color[c]);
                px[c] = blended.clamp(0.0, 255.0) as u8;
            }
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
