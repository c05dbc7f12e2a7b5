//! Data URL decoding for sprite uploads

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::RgbaImage;

/// Extract the raw bytes from a `data:image/...;base64,...` URL.
///
/// Returns a client-facing error message on malformed input.
pub fn parse_data_url(data_url: &str) -> Result<Vec<u8>, String> {
    if !data_url.starts_with("data:") {
        return Err(
            "Only data URL images are supported (expected data:image/...;base64,...)".to_string(),
        );
    }

    let Some((_, encoded)) = data_url.split_once(',') else {
        return Err("Invalid data URL format".to_string());
    };

    STANDARD
        .decode(encoded)
        .map_err(|_| "Invalid base64 image payload".to_string())
}

/// Decode a data URL into an RGBA sprite image
pub fn decode_image(data_url: &str) -> Result<RgbaImage, String> {
    let bytes = parse_data_url(data_url)?;

    image::load_from_memory(&bytes)
        .map(|img| img.to_rgba8())
        .map_err(|_| "Could not decode image data".to_string())
}
