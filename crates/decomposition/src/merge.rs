//! Merging labeled regions into parts and the correction pass
//!
//! Corrections run on working copies of the merged parts and the region
//! list; both are committed together once every rule has been applied, so a
//! later rule always sees the effect of an earlier one.

use sprite_parts_common::{BoundingBox, Mask, PartLabel};
use tracing::debug;

use crate::{LabeledRegion, MergedPart};

/// Torso estimates above this fraction of the character are rejected
const MAX_TORSO_FRACTION: f64 = 0.58;
/// Size window for a recovered torso, relative to the character
const RECOVERED_TORSO_MIN_AREA: usize = 64;
const RECOVERED_TORSO_MIN_FRACTION: f64 = 0.03;
const RECOVERED_TORSO_MAX_FRACTION: f64 = 0.45;
/// Central window of the character bounding box a recovered torso is clipped to
const TORSO_WINDOW_X: (f64, f64) = (0.28, 0.72);
const TORSO_WINDOW_Y: (f64, f64) = (0.28, 0.78);
/// Catch-all parts above this fraction of the character are dropped when any
/// other label exists
const MAX_OTHER_FRACTION: f64 = 0.88;

/// Union regions sharing a label, in first-appearance order
#[must_use]
pub fn merge_by_label(labeled: &[LabeledRegion]) -> Vec<MergedPart> {
    let mut merged: Vec<MergedPart> = Vec::new();
    for region in labeled {
        match merged.iter_mut().find(|p| p.label == region.label) {
            Some(part) => part.mask.union_with(&region.mask),
            None => merged.push(MergedPart {
                label: region.label,
                mask: region.mask.clone(),
            }),
        }
    }
    merged
}

/// Run the correction pass over merged parts
///
/// Rejects implausibly large torsos, reconstructs a missing torso from the
/// primary region, and suppresses a catch-all part that swallowed the whole
/// character. Returns the corrected parts with the matching region list.
pub fn apply_corrections(
    mut merged: Vec<MergedPart>,
    mut labeled: Vec<LabeledRegion>,
    selected: &[Mask],
    character_bbox: &BoundingBox,
    character_area: usize,
    width: u32,
    height: u32,
) -> (Vec<MergedPart>, Vec<LabeledRegion>) {
    drop_oversized_torso(&mut merged, &mut labeled, character_area);
    recover_missing_torso(
        &mut merged,
        &mut labeled,
        selected,
        character_bbox,
        character_area,
        width,
        height,
    );
    suppress_dominant_other(&mut merged, &mut labeled, character_area);
    (merged, labeled)
}

fn drop_oversized_torso(
    merged: &mut Vec<MergedPart>,
    labeled: &mut Vec<LabeledRegion>,
    character_area: usize,
) {
    let Some(pos) = merged.iter().position(|p| p.label == PartLabel::Torso) else {
        return;
    };
    let ratio = merged[pos].mask.area() as f64 / character_area.max(1) as f64;
    if ratio > MAX_TORSO_FRACTION {
        debug!("dropping torso covering {:.0}% of the character", ratio * 100.0);
        merged.remove(pos);
        labeled.retain(|r| r.label != PartLabel::Torso);
    }
}

/// Carve a torso out of the primary region when no region was labeled torso
///
/// Pixels claimed by specific parts are removed from the largest selected
/// region and the remainder is clipped to the central window of the
/// character. The estimate is only accepted at a plausible torso size.
fn recover_missing_torso(
    merged: &mut Vec<MergedPart>,
    labeled: &mut Vec<LabeledRegion>,
    selected: &[Mask],
    character_bbox: &BoundingBox,
    character_area: usize,
    width: u32,
    height: u32,
) {
    if merged.iter().any(|p| p.label == PartLabel::Torso) {
        return;
    }
    let Some(primary) = selected.first() else {
        return;
    };

    let mut torso = primary.clone();
    for label in PartLabel::SPECIFIC {
        if let Some(part) = merged.iter().find(|p| p.label == label) {
            torso.subtract_with(&part.mask);
        }
    }

    let bx = f64::from(character_bbox.x);
    let by = f64::from(character_bbox.y);
    let bw = f64::from(character_bbox.width);
    let bh = f64::from(character_bbox.height);
    let window = Mask::from_window(
        width,
        height,
        (bx + bw * TORSO_WINDOW_X.0) as u32,
        (by + bh * TORSO_WINDOW_Y.0) as u32,
        (bx + bw * TORSO_WINDOW_X.1) as u32,
        (by + bh * TORSO_WINDOW_Y.1) as u32,
    );
    torso.intersect_with(&window);

    let area = torso.area();
    let min_area =
        RECOVERED_TORSO_MIN_AREA.max((character_area as f64 * RECOVERED_TORSO_MIN_FRACTION) as usize);
    let max_area = (character_area as f64 * RECOVERED_TORSO_MAX_FRACTION) as usize;
    let ratio = area as f64 / character_area.max(1) as f64;

    if area >= min_area && area <= max_area && ratio <= RECOVERED_TORSO_MAX_FRACTION {
        debug!("recovered torso of {} pixels from the primary region", area);
        merged.push(MergedPart {
            label: PartLabel::Torso,
            mask: torso.clone(),
        });
        labeled.push(LabeledRegion {
            label: PartLabel::Torso,
            mask: torso,
        });
    }
}

fn suppress_dominant_other(
    merged: &mut Vec<MergedPart>,
    labeled: &mut Vec<LabeledRegion>,
    character_area: usize,
) {
    if merged.len() <= 1 {
        return;
    }
    let Some(pos) = merged.iter().position(|p| p.label == PartLabel::Other) else {
        return;
    };
    let ratio = merged[pos].mask.area() as f64 / character_area.max(1) as f64;
    if ratio >= MAX_OTHER_FRACTION {
        debug!(
            "suppressing catch-all part covering {:.0}% of the character",
            ratio * 100.0
        );
        merged.remove(pos);
        labeled.retain(|r| r.label != PartLabel::Other);
    }
}
