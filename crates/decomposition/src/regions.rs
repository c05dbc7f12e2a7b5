//! Candidate region filtering, deduplication and selection

use sprite_parts_common::Mask;
use std::cmp::Reverse;

/// Minimum fraction of a candidate that must survive clipping to the opaque mask
const MIN_CLIP_SURVIVAL: f64 = 0.18;
/// Border-touching regions above this fraction of the reference area are
/// background leaks
const MAX_BORDER_FRACTION: f64 = 0.78;
/// IoU at or above which two similarly sized regions are duplicates
const DUPLICATE_IOU: f64 = 0.92;
const DUPLICATE_SIZE_RATIO_MIN: f64 = 0.8;
const DUPLICATE_SIZE_RATIO_MAX: f64 = 1.25;
/// Containment at or above which a region duplicates an already kept one
const DUPLICATE_CONTAINMENT: f64 = 0.985;
const CONTAINMENT_SIZE_RATIO_MIN: f64 = 0.9;
/// Absolute floor for the minimum accepted region area
const MIN_REGION_AREA: usize = 32;
/// Minimum region area as a fraction of the character area
const MIN_REGION_FRACTION: f64 = 0.0015;

/// Minimum area for an accepted region, relative to the character
#[must_use]
pub fn min_region_area(character_area: usize) -> usize {
    MIN_REGION_AREA.max((character_area as f64 * MIN_REGION_FRACTION) as usize)
}

/// Drop candidate masks that cannot be character parts
///
/// Dimension mismatches and empty masks are discarded outright. When an
/// opaque mask is available each candidate is clipped to it; clips that erase
/// most of a candidate mark spurious background regions and are dropped too.
/// Large regions touching the image border are rejected as background leaks.
pub fn filter_candidates(
    candidates: Vec<Mask>,
    width: u32,
    height: u32,
    opaque_mask: Option<&Mask>,
) -> Vec<Mask> {
    let opaque_area = opaque_mask.map_or(0, Mask::area);
    let reference_area = if opaque_area > 0 {
        opaque_area
    } else {
        (width as usize) * (height as usize)
    }
    .max(1);

    let mut kept = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !candidate.matches_dimensions(width, height) {
            continue;
        }
        let raw_area = candidate.area();
        if raw_area == 0 {
            continue;
        }

        let region = match opaque_mask {
            Some(opaque) => {
                let clipped = candidate.intersection(opaque);
                let clipped_area = clipped.area();
                if clipped_area == 0 {
                    continue;
                }
                if (clipped_area as f64) / (raw_area.max(1) as f64) < MIN_CLIP_SURVIVAL {
                    continue;
                }
                clipped
            }
            None => candidate,
        };

        let region_area = region.area();
        if region.touches_border()
            && region_area as f64 / reference_area as f64 > MAX_BORDER_FRACTION
        {
            continue;
        }
        kept.push(region);
    }
    kept
}

/// Greedily select regions from largest to smallest, skipping duplicates
///
/// Mirrors non-maximum suppression: a candidate is a duplicate when it
/// overlaps an already selected region at high IoU and similar size, or when
/// it is almost entirely contained in one without being much smaller.
pub fn select_regions(kept: Vec<Mask>, min_area: usize, max_regions: usize) -> Vec<Mask> {
    let mut ordered = kept;
    ordered.sort_by_cached_key(|m| Reverse(m.area()));

    let mut selected: Vec<(Mask, usize)> = Vec::new();
    for region in ordered {
        let area = region.area();
        if area < min_area {
            continue;
        }
        let duplicate = selected
            .iter()
            .any(|(existing, existing_area)| is_duplicate(&region, area, existing, *existing_area));
        if duplicate {
            continue;
        }
        selected.push((region, area));
        if selected.len() >= max_regions {
            break;
        }
    }
    selected.into_iter().map(|(mask, _)| mask).collect()
}

fn is_duplicate(region: &Mask, area: usize, existing: &Mask, existing_area: usize) -> bool {
    if existing_area == 0 {
        return false;
    }
    let inter = region.intersection_area(existing);
    let union = area + existing_area - inter;
    if union == 0 {
        return false;
    }

    let iou = inter as f64 / union as f64;
    let size_ratio = area as f64 / existing_area.max(1) as f64;
    let containment = inter as f64 / area.max(1) as f64;

    if iou >= DUPLICATE_IOU
        && (DUPLICATE_SIZE_RATIO_MIN..=DUPLICATE_SIZE_RATIO_MAX).contains(&size_ratio)
    {
        return true;
    }
    containment >= DUPLICATE_CONTAINMENT && size_ratio >= CONTAINMENT_SIZE_RATIO_MIN
}
