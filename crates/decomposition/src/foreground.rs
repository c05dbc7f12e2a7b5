//! Opaque-foreground estimation
//!
//! Sprites normally carry a meaningful alpha channel, so the opaque mask is
//! a plain alpha threshold. Assets that were flattened onto a solid backdrop
//! report near-total alpha coverage; for those the estimate falls back to a
//! color flood fill anchored at the image border.

use image::RgbaImage;
use ndarray::Array2;
use sprite_parts_common::Mask;
use std::collections::VecDeque;
use tracing::{debug, info};

/// Alpha coverage above which the alpha channel is considered uninformative
/// and the flood-fill refinement runs
const FLOOD_FILL_TRIGGER: f64 = 0.94;

/// Plausibility band for the flood-fill foreground, as fractions of the image
const MIN_FOREGROUND_FRACTION: f64 = 0.03;
const MAX_FOREGROUND_FRACTION: f64 = 0.97;

/// Pixels with alpha at or above `cutoff`
#[must_use]
pub fn alpha_opaque_mask(image: &RgbaImage, cutoff: u8) -> Mask {
    Mask::from_alpha(image, cutoff)
}

/// Estimate the opaque-foreground mask of a sprite
///
/// Starts from the alpha threshold mask. When that mask covers nearly the
/// whole image, a border-anchored flood fill over the color channels takes
/// over; its result is accepted only when it carves out a plausible
/// silhouette, otherwise the alpha mask is returned unchanged.
#[must_use]
pub fn estimate_opaque_mask(
    image: &RgbaImage,
    alpha_cutoff: u8,
    background_tolerance: i32,
) -> Mask {
    let alpha_mask = alpha_opaque_mask(image, alpha_cutoff);
    refine_with_flood_fill(image, alpha_mask, background_tolerance)
}

fn refine_with_flood_fill(image: &RgbaImage, alpha_mask: Mask, tolerance: i32) -> Mask {
    let (width, height) = image.dimensions();
    if width <= 2 || height <= 2 {
        return alpha_mask;
    }

    let total = (width as usize) * (height as usize);
    let alpha_area = alpha_mask.area();
    if alpha_area < (total as f64 * FLOOD_FILL_TRIGGER) as usize {
        return alpha_mask;
    }
    debug!(
        "alpha mask covers {}/{} pixels, refining with border flood fill",
        alpha_area, total
    );

    let candidate_bg = background_candidates(image, tolerance);
    let w = width as usize;
    let h = height as usize;
    let mut visited = Array2::from_elem((h, w), false);
    let mut queue: VecDeque<(usize, usize)> = VecDeque::new();

    for x in 0..w {
        for y in [0, h - 1] {
            if candidate_bg[[y, x]] && !visited[[y, x]] {
                visited[[y, x]] = true;
                queue.push_back((y, x));
            }
        }
    }
    for y in 0..h {
        for x in [0, w - 1] {
            if candidate_bg[[y, x]] && !visited[[y, x]] {
                visited[[y, x]] = true;
                queue.push_back((y, x));
            }
        }
    }

    while let Some((y, x)) = queue.pop_front() {
        for (dy, dx) in [(1i64, 0i64), (-1, 0), (0, 1), (0, -1)] {
            let ny = y as i64 + dy;
            let nx = x as i64 + dx;
            if (0..h as i64).contains(&ny) && (0..w as i64).contains(&nx) {
                let (ny, nx) = (ny as usize, nx as usize);
                if candidate_bg[[ny, nx]] && !visited[[ny, nx]] {
                    visited[[ny, nx]] = true;
                    queue.push_back((ny, nx));
                }
            }
        }
    }

    let foreground = Mask::from_grid(visited.mapv(|v| !v));
    let foreground_area = foreground.area();
    if foreground_area < (total as f64 * MIN_FOREGROUND_FRACTION) as usize
        || foreground_area > (total as f64 * MAX_FOREGROUND_FRACTION) as usize
    {
        info!(
            "flood fill produced an implausible foreground ({}/{} pixels), keeping alpha mask",
            foreground_area, total
        );
        return alpha_mask;
    }

    debug!("flood fill foreground covers {}/{} pixels", foreground_area, total);
    foreground
}

/// Per-pixel test against the four corner colors
///
/// A pixel is a background candidate when its Manhattan RGB distance to the
/// nearest corner color is within `tolerance * 3`.
fn background_candidates(image: &RgbaImage, tolerance: i32) -> Array2<bool> {
    let (width, height) = image.dimensions();
    let corners = [
        rgb_at(image, 0, 0),
        rgb_at(image, width - 1, 0),
        rgb_at(image, 0, height - 1),
        rgb_at(image, width - 1, height - 1),
    ];
    let threshold = tolerance * 3;

    Array2::from_shape_fn((height as usize, width as usize), |(y, x)| {
        let px = rgb_at(image, x as u32, y as u32);
        corners
            .iter()
            .map(|c| (px[0] - c[0]).abs() + (px[1] - c[1]).abs() + (px[2] - c[2]).abs())
            .min()
            .is_some_and(|d| d <= threshold)
    })
}

fn rgb_at(image: &RgbaImage, x: u32, y: u32) -> [i32; 3] {
    let p = image.get_pixel(x, y);
    [i32::from(p[0]), i32::from(p[1]), i32::from(p[2])]
}
