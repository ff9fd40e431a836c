//! Colour adjustment filters: Invert, Sepia.
//!
//! These are pixel-wise operations that don't require spatial context.
//! Alpha channel (if present) is always preserved unchanged.

use crate::image::{assemble, PixelBuffer};

// ============================================================================
// Invert
// ============================================================================

/// Invert the colour channels (`255 - v`).
pub fn invert(image: &PixelBuffer) -> PixelBuffer {
    let input = image.view();
    let alpha = image.alpha();
    assemble(image.height(), image.width(), alpha.as_ref(), |y, x, c| 255 - input[[y, x, c]])
}

// ============================================================================
// Sepia
// ============================================================================

/// Sepia tone matrix, one row per output channel.
const SEPIA: [[f64; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

/// Apply a sepia tone.
///
/// Each output channel is a fixed weighted sum of the input R, G and B,
/// clamped to 0-255 and truncated.
pub fn sepia(image: &PixelBuffer) -> PixelBuffer {
    let input = image.view();
    let alpha = image.alpha();
    assemble(image.height(), image.width(), alpha.as_ref(), |y, x, c| {
        let [wr, wg, wb] = SEPIA[c];
        let v = input[[y, x, 0]] as f64 * wr + input[[y, x, 1]] as f64 * wg + input[[y, x, 2]] as f64 * wb;
        v.clamp(0.0, 255.0) as u8
    })
}
