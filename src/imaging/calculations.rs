//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::backend::Dimensions;

/// Whether a scale percentage changes the image at all.
///
/// `None` and `Some(100)` both leave the pixels as decoded.
pub fn needs_resize(scale_percent: Option<u32>) -> bool {
    scale_percent.is_some_and(|p| p != 100)
}

/// Scale dimensions proportionally by a percentage.
///
/// Each edge is `floor(edge * percent / 100)`, but never less than one
/// pixel, since an empty image cannot be encoded.
///
/// # Examples
/// ```
/// # use image_resize::imaging::{Dimensions, scaled_dimensions};
/// let half = scaled_dimensions(Dimensions { width: 801, height: 600 }, 50);
/// assert_eq!(half, Dimensions { width: 400, height: 300 });
/// ```
pub fn scaled_dimensions(source: Dimensions, percent: u32) -> Dimensions {
    let scale = |edge: u32| -> u32 {
        let scaled = u64::from(edge) * u64::from(percent) / 100;
        u32::try_from(scaled).unwrap_or(u32::MAX).max(1)
    };
    Dimensions {
        width: scale(source.width),
        height: scale(source.height),
    }
}
