//! Grayscale conversion filter.
//!
//! Uses gamma-weighted luma coefficients (ITU-R BT.601 rounded to four
//! places), so the three weights sum to 0.9999 rather than 1.
//! Output keeps three identical colour channels so it can feed any other
//! operation; alpha is preserved.

use crate::image::{assemble, PixelBuffer};

const LUMA_R: f64 = 0.2989;
const LUMA_G: f64 = 0.5870;
const LUMA_B: f64 = 0.1140;

/// Luma of one pixel, unclamped.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> f64 {
    r as f64 * LUMA_R + g as f64 * LUMA_G + b as f64 * LUMA_B
}

/// Convert an image to grayscale.
///
/// # Arguments
/// * `image` - RGB or RGBA image
///
/// # Returns
/// Image with R=G=B=luma and alpha preserved
pub fn grayscale(image: &PixelBuffer) -> PixelBuffer {
    let input = image.view();
    let alpha = image.alpha();
    assemble(image.height(), image.width(), alpha.as_ref(), |y, x, _| {
        luma(input[[y, x, 0]], input[[y, x, 1]], input[[y, x, 2]]).clamp(0.0, 255.0) as u8
    })
}
