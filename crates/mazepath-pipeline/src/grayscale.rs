//! Image decoding and channel conversion.
//!
//! Accepts raw image bytes (PNG, JPEG, TIFF, BMP, WebP) and produces the
//! decoded image the extractor works on, plus the opaque RGBA copy used
//! as the display layer.

use image::{DynamicImage, GrayImage, RgbaImage};

use crate::types::PipelineError;

/// Decode raw image bytes.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] if `bytes` is empty.
/// Returns [`PipelineError::ImageDecode`] if the image format is
/// unrecognized or the data is corrupt.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, PipelineError> {
    if bytes.is_empty() {
        return Err(PipelineError::EmptyInput);
    }
    Ok(image::load_from_memory(bytes)?)
}

/// Luminance (`0.299*R + 0.587*G + 0.114*B`) of a decoded image.
#[must_use = "returns the grayscale image"]
pub fn to_gray(image: &DynamicImage) -> GrayImage {
    image.to_luma8()
}

/// Opaque RGBA copy of a decoded image.
///
/// Transparency is dropped: the display layer is always drawn over
/// as if the source were flattened, matching a plain RGB conversion.
#[must_use = "returns the RGBA display image"]
pub fn to_display_rgba(image: &DynamicImage) -> RgbaImage {
    let rgb = image.to_rgb8();
    RgbaImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        image::Rgba([r, g, b, 255])
    })
}
