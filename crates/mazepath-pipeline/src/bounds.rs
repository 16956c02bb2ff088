//! Content bounding box and border sealing.
//!
//! Scans and photos usually carry a margin of paper or background around
//! the drawn maze. Once binarized, that margin reads as open passage and
//! would let the search walk around the outside of the maze. The box of
//! all wall pixels marks where the maze really is; everything outside it
//! is forced to wall.

use image::GrayImage;

use crate::types::{Bounds, Cell};

/// Bounding box of all wall (0-valued) pixels.
///
/// Returns the full image when there are no wall pixels.
#[must_use]
pub fn content_bounds(binary: &GrayImage) -> Bounds {
    let mut found: Option<Bounds> = None;
    for (x, y, p) in binary.enumerate_pixels() {
        if p.0[0] != 0 {
            continue;
        }
        found = Some(match found {
            None => Bounds {
                left: x,
                right: x,
                top: y,
                bottom: y,
            },
            Some(b) => Bounds {
                left: b.left.min(x),
                right: b.right.max(x),
                top: b.top.min(y),
                bottom: b.bottom.max(y),
            },
        });
    }
    found.unwrap_or(Bounds {
        left: 0,
        right: binary.width().saturating_sub(1),
        top: 0,
        bottom: binary.height().saturating_sub(1),
    })
}

/// Force every pixel outside `bounds` to wall (0).
#[must_use = "returns the sealed image"]
pub fn seal_outside(binary: &GrayImage, bounds: Bounds) -> GrayImage {
    GrayImage::from_fn(binary.width(), binary.height(), |x, y| {
        if bounds.contains(Cell::from_xy(x, y)) {
            *binary.get_pixel(x, y)
        } else {
            image::Luma([0])
        }
    })
}
