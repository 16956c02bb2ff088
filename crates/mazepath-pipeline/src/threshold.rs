//! Binarization: split a grayscale maze into walls (0) and passages (255).
//!
//! This module defines the [`Binarizer`] trait for pluggable threshold
//! selection and the [`ThresholdMethod`] enum for choosing one at
//! runtime from the pipeline configuration.
//!
//! Both methods are deterministic for a given image and produce a
//! two-level image: pixels strictly brighter than the selected level
//! become 255, all others 0.

use image::GrayImage;
use imageproc::contrast::ThresholdType;
use serde::{Deserialize, Serialize};

/// Selects how the binarization level is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ThresholdMethod {
    /// Otsu's method: the level maximizing between-class variance.
    #[default]
    Otsu,
    /// A fixed fraction of the mean intensity.
    ///
    /// Cheaper and more predictable on evenly lit scans, but sensitive
    /// to large uniform margins that drag the mean.
    MeanRatio {
        /// Multiplier applied to the mean intensity.
        ratio: f64,
    },
}

impl ThresholdMethod {
    /// Ratio used by [`ThresholdMethod::MeanRatio`] unless configured.
    pub const DEFAULT_MEAN_RATIO: f64 = 0.8;
}

/// Trait for threshold strategies.
///
/// Input: a grayscale image. Output: the binarized image and the level
/// that separated the two classes.
pub trait Binarizer {
    /// Binarize the image.
    fn binarize(&self, gray: &GrayImage) -> (GrayImage, u8);
}

impl Binarizer for ThresholdMethod {
    fn binarize(&self, gray: &GrayImage) -> (GrayImage, u8) {
        let level = match *self {
            Self::Otsu => imageproc::contrast::otsu_level(gray),
            Self::MeanRatio { ratio } => mean_ratio_level(gray, ratio),
        };
        let binary = imageproc::contrast::threshold(gray, level, ThresholdType::Binary);
        (binary, level)
    }
}

/// Integer level equivalent to `pixel > mean * ratio`.
///
/// Pixels are integral, so `p > x` holds exactly when `p > floor(x)`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn mean_ratio_level(gray: &GrayImage, ratio: f64) -> u8 {
    let raw = gray.as_raw();
    if raw.is_empty() {
        return 0;
    }
    let sum: u64 = raw.iter().map(|&p| u64::from(p)).sum();
    let level = sum as f64 / raw.len() as f64 * ratio;
    level.floor().clamp(0.0, 255.0) as u8
}
