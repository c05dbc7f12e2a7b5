//! PNG and data-URL encoding for previews and masks

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{ImageFormat, RgbaImage};
use sprite_parts_common::Mask;
use std::io::Cursor;

use crate::PreviewError;

/// Encode an RGBA image as PNG bytes
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, PreviewError> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| PreviewError::Encode(e.to_string()))?;
    Ok(buffer.into_inner())
}

/// Encode an RGBA image as a `data:image/png;base64,` URL
pub fn png_data_url(image: &RgbaImage) -> Result<String, PreviewError> {
    let bytes = encode_png(image)?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(bytes)))
}

/// Encode a mask as a grayscale PNG, 255 inside and 0 outside
pub fn mask_png(mask: &Mask) -> Result<Vec<u8>, PreviewError> {
    let mut buffer = Cursor::new(Vec::new());
    mask.to_luma()
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| PreviewError::Encode(e.to_string()))?;
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_round_trip() {
        let image = RgbaImage::from_pixel(12, 8, image::Rgba([10, 20, 30, 255]));
        let bytes = encode_png(&image).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), 12);
        assert_eq!(decoded.height(), 8);
    }

    #[test]
    fn test_data_url_prefix() {
        let image = RgbaImage::new(4, 4);
        let url = png_data_url(&image).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
        assert!(url.len() > "data:image/png;base64,".len());
    }

    #[test]
    fn test_mask_png_is_grayscale() {
        let mask = Mask::from_fn(10, 10, |x, _| x < 5);
        let bytes = mask_png(&mask).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_luma8();
        assert_eq!(decoded.get_pixel(0, 0)[0], 255);
        assert_eq!(decoded.get_pixel(9, 9)[0], 0);
    }
}
