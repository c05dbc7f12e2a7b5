//! System font discovery for overlay text
//!
//! No font ships with the crate; well-known system locations are probed once
//! at first use. Without a usable font the previews keep their rectangles
//! and skip the text labels.

use ab_glyph::FontArc;
use once_cell::sync::Lazy;
use tracing::{debug, warn};

const FONT_CANDIDATES: [&str; 6] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/local/share/fonts/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
];

static SYSTEM_FONT: Lazy<Option<FontArc>> = Lazy::new(|| {
    for path in FONT_CANDIDATES {
        let Ok(data) = std::fs::read(path) else {
            continue;
        };
        match FontArc::try_from_vec(data) {
            Ok(font) => {
                debug!("using overlay font {}", path);
                return Some(font);
            }
            Err(e) => warn!("failed to parse font {}: {}", path, e),
        }
    }
    warn!("no system font found, preview overlays will omit text labels");
    None
});

/// Shared overlay font, resolved once per process
pub(crate) fn system_font() -> Option<&'static FontArc> {
    SYSTEM_FONT.as_ref()
}
