//! Median filtering for speckle removal.
//!
//! Wraps [`imageproc::filter::median_filter`]. The extractor runs it
//! twice: once before thresholding to remove scan speckle, and once after
//! the border is sealed to smooth ragged wall edges.

use image::GrayImage;

/// Apply a square median filter of the given radius.
///
/// A radius of 1 is a 3x3 kernel. Radius 0 returns the image unchanged.
/// Pixels beyond the image edge are treated as copies of the nearest
/// edge pixel.
#[must_use = "returns the filtered image"]
pub fn median(image: &GrayImage, radius: u32) -> GrayImage {
    if radius == 0 {
        return image.clone();
    }
    imageproc::filter::median_filter(image, radius, radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::cast_possible_truncation)]
    fn zero_radius_returns_identical_image() {
        let img = GrayImage::from_fn(5, 5, |x, y| image::Luma([((x * 7 + y * 13) % 256) as u8]));
        assert_eq!(median(&img, 0), img);
    }

    #[test]
    fn removes_isolated_speckle() {
        let mut img = GrayImage::from_pixel(9, 9, image::Luma([255]));
        img.put_pixel(4, 4, image::Luma([0]));
        let filtered = median(&img, 1);
        assert_eq!(filtered.get_pixel(4, 4).0[0], 255);
    }

    #[test]
    fn keeps_thick_wall() {
        // A 3-pixel-wide black column survives a 3x3 median.
        let img = GrayImage::from_fn(9, 9, |x, _| {
            image::Luma([if (3..6).contains(&x) { 0 } else { 255 }])
        });
        let filtered = median(&img, 1);
        assert_eq!(filtered.get_pixel(4, 4).0[0], 0);
        assert_eq!(filtered.get_pixel(0, 4).0[0], 255);
    }

    #[test]
    fn output_dimensions_preserved() {
        let img = GrayImage::new(17, 31);
        let filtered = median(&img, 1);
        assert_eq!((filtered.width(), filtered.height()), (17, 31));
    }
}
