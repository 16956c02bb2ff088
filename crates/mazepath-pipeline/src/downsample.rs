//! Image downscaling to a bounded working resolution.
//!
//! Reduces the loaded maze so its longest side is at most the configured
//! `max_dimension`. Every later stage (median filter, thresholding,
//! thinning, search) scales with the pixel count, so this is the main
//! bound on load and solve time.
//!
//! If the image is already at or below the cap, it is returned unchanged.
//! There is no way to skip the cap; a larger working size means a larger
//! `max_dimension`.

use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// Resampling filter used when downscaling.
///
/// Ordered from fastest/lowest-quality to slowest/highest-quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DownsampleFilter {
    /// Nearest-neighbor: fastest, blocky artifacts.
    Nearest,
    /// Bilinear interpolation: fast, decent quality.
    Triangle,
    /// Bicubic (Catmull-Rom): moderate speed, good quality.
    CatmullRom,
    /// Gaussian: moderate speed, smooth output.
    Gaussian,
    /// Lanczos with 3 lobes: slowest, keeps thin maze walls crisp.
    #[default]
    Lanczos3,
}

impl DownsampleFilter {
    /// Convert to the `image` crate's `FilterType`.
    const fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            Self::Nearest => image::imageops::FilterType::Nearest,
            Self::Triangle => image::imageops::FilterType::Triangle,
            Self::CatmullRom => image::imageops::FilterType::CatmullRom,
            Self::Gaussian => image::imageops::FilterType::Gaussian,
            Self::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// Downscale a decoded maze so its longest side is at most
/// `max_dimension` pixels, preserving aspect ratio.
///
/// Returns `None` when the image already fits; the caller keeps using
/// the original.
#[must_use]
pub fn downsample(
    image: &DynamicImage,
    max_dimension: u32,
    filter: DownsampleFilter,
) -> Option<DynamicImage> {
    if image.width().max(image.height()) <= max_dimension {
        return None;
    }
    Some(image.resize(max_dimension, max_dimension, filter.to_image_filter()))
}
