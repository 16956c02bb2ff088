//! Grid extraction: turn a loaded maze image into a traversability grid.
//!
//! # Steps
//!
//! 1. Downscale so the longest side is at most `max_dimension`
//! 2. Median filter (speckle removal)
//! 3. Binarize into walls (0) and passages (255)
//! 4. Bounding box of all wall pixels
//! 5. Force everything outside the box to wall
//! 6. Second median filter pass
//!
//! The output grid marks a cell passable iff its pixel is 255 after
//! step 6 and it lies inside the box from step 4, so the margin is
//! always blocked.

use image::DynamicImage;

use crate::threshold::Binarizer;
use crate::types::{Bounds, Dimensions, Grid, PipelineConfig, RgbaImage};

/// Everything the extractor produced for one loaded image.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// The traversability grid.
    pub grid: Grid,
    /// Downscaled color image shown to the user.
    pub display: RgbaImage,
    /// Detected maze content box.
    pub bounds: Bounds,
    /// Level chosen by the threshold method.
    pub threshold_level: u8,
    /// Dimensions of the image before downscaling.
    pub source_dimensions: Dimensions,
    /// Whether downscaling was applied.
    pub downsampled: bool,
}

/// Run the extraction steps on an already decoded image.
#[must_use]
pub fn extract(image: &DynamicImage, config: &PipelineConfig) -> Extraction {
    let source_dimensions = Dimensions {
        width: image.width(),
        height: image.height(),
    };

    let resized =
        crate::downsample::downsample(image, config.max_dimension, config.downsample_filter);
    let downsampled = resized.is_some();
    let working = resized.as_ref().unwrap_or(image);
    let display = crate::grayscale::to_display_rgba(working);
    let gray = crate::grayscale::to_gray(working);

    let smoothed = crate::denoise::median(&gray, config.median_radius);
    let (binary, threshold_level) = config.threshold.binarize(&smoothed);
    let bounds = crate::bounds::content_bounds(&binary);
    let sealed = crate::bounds::seal_outside(&binary, bounds);
    let binary = crate::denoise::median(&sealed, config.median_radius);

    let grid = Grid::from_fn(binary.width(), binary.height(), |cell| {
        bounds.contains(cell) && binary.get_pixel(cell.col, cell.row).0[0] == 255
    });

    log::debug!(
        "extracted {}x{} grid (source {}x{}, level {threshold_level}, {} passable, bounds {bounds:?})",
        grid.width(),
        grid.height(),
        source_dimensions.width,
        source_dimensions.height,
        grid.passable_count(),
    );

    Extraction {
        grid,
        display,
        bounds,
        threshold_level,
        source_dimensions,
        downsampled,
    }
}
