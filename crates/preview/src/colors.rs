//! Overlay color assignments

use image::Rgba;
use sprite_parts_common::PartLabel;

/// Fixed overlay color for each part label (RGBA)
#[inline]
#[must_use]
pub const fn label_color(label: PartLabel) -> Rgba<u8> {
    match label {
        PartLabel::Head => Rgba([255, 99, 132, 255]),
        PartLabel::Torso => Rgba([54, 162, 235, 255]),
        PartLabel::LeftArm => Rgba([255, 205, 86, 255]),
        PartLabel::RightArm => Rgba([75, 192, 192, 255]),
        PartLabel::LeftLeg => Rgba([153, 102, 255, 255]),
        PartLabel::RightLeg => Rgba([255, 159, 64, 255]),
        PartLabel::WeaponOrAccessory => Rgba([201, 203, 207, 255]),
        PartLabel::Other => Rgba([129, 255, 161, 255]),
    }
}

/// Rotating palette for individual regions
const REGION_PALETTE: [Rgba<u8>; 12] = [
    Rgba([255, 99, 132, 255]),
    Rgba([54, 162, 235, 255]),
    Rgba([255, 205, 86, 255]),
    Rgba([75, 192, 192, 255]),
    Rgba([153, 102, 255, 255]),
    Rgba([255, 159, 64, 255]),
    Rgba([129, 255, 161, 255]),
    Rgba([201, 203, 207, 255]),
    Rgba([247, 99, 220, 255]),
    Rgba([99, 247, 220, 255]),
    Rgba([220, 160, 99, 255]),
    Rgba([120, 180, 255, 255]),
];

/// Palette color for the region at `index`, wrapping around
#[inline]
#[must_use]
pub const fn region_color(index: usize) -> Rgba<u8> {
    REGION_PALETTE[index % REGION_PALETTE.len()]
}

/// CSS-style `rgb(r,g,b)` string used in the JSON summaries
#[must_use]
pub fn rgb_string(color: Rgba<u8>) -> String {
    format!("rgb({},{},{})", color[0], color[1], color[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_string_format() {
        assert_eq!(rgb_string(Rgba([54, 162, 235, 255])), "rgb(54,162,235)");
    }

    #[test]
    fn test_palette_wraps() {
        assert_eq!(region_color(0), region_color(12));
        assert_eq!(region_color(3), region_color(15));
    }

    #[test]
    fn test_every_label_has_a_color() {
        for label in PartLabel::ALL {
            // alpha channel is always opaque
            assert_eq!(label_color(label)[3], 255);
        }
    }
}
