//! mazepath-pipeline: Pure maze-solving pipeline (sans-IO).
//!
//! Turns a photographed or scanned maze into a path through it:
//! downscale -> binarize -> seal margin -> grid -> thin -> snap
//! endpoints -> breadth-first search -> animation frames.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! byte slices and decoded images and returns structured data. Reading
//! files and drawing frames live in `mazepath` and `mazepath-render`.

pub mod animation;
pub mod bounds;
pub mod denoise;
pub mod diagnostics;
pub mod downsample;
pub mod extract;
pub mod gradient;
pub mod grayscale;
pub mod search;
pub mod session;
pub mod skeleton;
pub mod snap;
pub mod threshold;
pub mod types;

pub use animation::{Animation, Frame, PaintedCell, Segment};
pub use diagnostics::{PipelineDiagnostics, PipelineSummary, StageDiagnostics, StageMetrics};
pub use downsample::DownsampleFilter;
pub use extract::{Extraction, extract};
pub use gradient::ColorGradient;
pub use search::{SearchResult, search};
pub use session::{LoadedView, MazeSession, Solution, format_seconds};
pub use skeleton::{Thinning, thin};
pub use snap::{snap, try_snap};
pub use threshold::{Binarizer, ThresholdMethod};
pub use types::{
    AnimationStyle, Bounds, Cell, CellPath, Dimensions, GrayImage, Grid, PipelineConfig,
    PipelineError, Rgb, RgbaImage, Status,
};

/// Decode image bytes and extract a grid in one call.
///
/// Takes raw image bytes (PNG, JPEG, TIFF, BMP, WebP) and a
/// configuration and runs the extraction steps described in
/// [`extract`](mod@extract).
///
/// # Errors
///
/// Returns [`PipelineError::InvalidConfig`] if the configuration fails
/// validation.
/// Returns [`PipelineError::EmptyInput`] if `image_bytes` is empty.
/// Returns [`PipelineError::ImageDecode`] if the image format is unrecognized.
pub fn extract_bytes(
    image_bytes: &[u8],
    config: &PipelineConfig,
) -> Result<Extraction, PipelineError> {
    config.validate()?;
    let image = grayscale::decode(image_bytes)?;
    Ok(extract(&image, config))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// Encode a PNG: white page, black square outline 2px thick with a
    /// one-pixel gap in its left wall.
    fn outlined_square_png() -> Vec<u8> {
        let img = image::GrayImage::from_fn(32, 32, |x, y| {
            let on_ring = (6..26).contains(&x)
                && (6..26).contains(&y)
                && !((8..24).contains(&x) && (8..24).contains(&y));
            let gap = x < 8 && y == 16;
            if on_ring && !gap {
                image::Luma([0])
            } else {
                image::Luma([255])
            }
        });
        let mut buf = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn extract_bytes_reads_png() {
        let result = extract_bytes(&outlined_square_png(), &PipelineConfig::default()).unwrap();
        assert_eq!(result.grid.dimensions(), Dimensions { width: 32, height: 32 });
        assert_eq!(
            result.bounds,
            Bounds {
                left: 6,
                right: 25,
                top: 6,
                bottom: 25
            }
        );
        assert!(result.grid.is_passable(Cell::new(16, 16)));
        assert!(!result.grid.is_passable(Cell::new(2, 2)));
    }

    #[test]
    fn extract_bytes_rejects_empty_input() {
        let result = extract_bytes(&[], &PipelineConfig::default());
        assert!(matches!(result, Err(PipelineError::EmptyInput)));
    }

    #[test]
    fn extract_bytes_rejects_bad_config() {
        let config = PipelineConfig {
            max_dimension: 0,
            ..PipelineConfig::default()
        };
        let result = extract_bytes(&outlined_square_png(), &config);
        assert!(matches!(result, Err(PipelineError::InvalidConfig(_))));
    }
}
