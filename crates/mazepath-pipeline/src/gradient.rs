//! Two-color linear gradient used to tint the visitation trail.

use serde::{Deserialize, Serialize};

use crate::types::Rgb;

/// Linear interpolation between two colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorGradient {
    /// Color at `t = 0`.
    pub start: Rgb,
    /// Color at `t = 1`.
    pub end: Rgb,
}

impl ColorGradient {
    /// Create a gradient between two colors.
    #[must_use]
    pub const fn new(start: Rgb, end: Rgb) -> Self {
        Self { start, end }
    }

    /// Color at progress `t`, clamped to `[0, 1]`.
    ///
    /// Each channel is `start + round(t * (end - start))`, so both
    /// endpoints are reproduced exactly.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn lerp(&self, t: f64) -> Rgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let channel = |i: usize| {
            let a = f64::from(self.start.0[i]);
            let b = f64::from(self.end.0[i]);
            (a + (t * (b - a)).round()).clamp(0.0, 255.0) as u8
        };
        Rgb([channel(0), channel(1), channel(2)])
    }
}

/// Normalized progress of item `index` among `count` items.
///
/// `index / (count - 1)`, or 0 when there is at most one item.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn progress(index: usize, count: usize) -> f64 {
    if count <= 1 {
        0.0
    } else {
        index as f64 / (count - 1) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Rgb = Rgb::new(107, 154, 205);
    const B: Rgb = Rgb::new(174, 205, 107);

    #[test]
    fn endpoints_are_exact() {
        let g = ColorGradient::new(A, B);
        assert_eq!(g.lerp(0.0), A);
        assert_eq!(g.lerp(1.0), B);
    }

    #[test]
    fn midpoint_rounds() {
        let g = ColorGradient::new(Rgb::new(0, 0, 255), Rgb::new(255, 1, 0));
        // 127.5 rounds away from zero; 0.5 likewise; -127.5 rounds to -128.
        assert_eq!(g.lerp(0.5), Rgb::new(128, 1, 127));
    }

    #[test]
    fn out_of_range_progress_is_clamped() {
        let g = ColorGradient::new(A, B);
        assert_eq!(g.lerp(-3.0), A);
        assert_eq!(g.lerp(7.0), B);
        assert_eq!(g.lerp(f64::NAN), A);
    }

    #[test]
    fn progress_of_single_item_is_zero() {
        assert!(progress(0, 1).abs() < f64::EPSILON);
        assert!(progress(0, 0).abs() < f64::EPSILON);
    }

    #[test]
    fn progress_spans_unit_interval() {
        assert!(progress(0, 5).abs() < f64::EPSILON);
        assert!((progress(2, 5) - 0.5).abs() < f64::EPSILON);
        assert!((progress(4, 5) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn channels_stay_between_endpoints() {
        let g = ColorGradient::new(A, B);
        for i in 0..=100 {
            let c = g.lerp(progress(i, 101));
            for ch in 0..3 {
                let lo = A.0[ch].min(B.0[ch]);
                let hi = A.0[ch].max(B.0[ch]);
                assert!((lo..=hi).contains(&c.0[ch]), "step {i} channel {ch}");
            }
        }
    }
}
