//! Composite one image over another.
//!
//! The top image is placed with its top-left corner at an offset (which may
//! be negative) and blended with Porter-Duff "over". Its effective opacity is
//! the global `alpha` multiplied by its own alpha channel, if it has one.
//! Output has the bottom image's size and channel count.

use super::core::blend_over;
use crate::error::{FilterError, Result};
use crate::image::{PixelBuffer, ALPHA};

pub const DEFAULT_ALPHA: f64 = 0.5;

/// Composite `top` over `bottom`.
///
/// # Arguments
/// * `bottom` - Base image, defines the output size
/// * `top` - Image placed over the base
/// * `alpha` - Opacity multiplier for `top`, 0.0-1.0
/// * `offset_x`, `offset_y` - Position of `top`'s top-left corner
///
/// # Returns
/// Blended image; pixels of `top` falling outside `bottom` are dropped
pub fn composite(
    bottom: &PixelBuffer,
    top: &PixelBuffer,
    alpha: f64,
    offset_x: i64,
    offset_y: i64,
) -> Result<PixelBuffer> {
    if !(0.0..=1.0).contains(&alpha) {
        return Err(FilterError::parameter(
            "alpha",
            format!("must be in the range [0, 1], got {}", alpha),
        ));
    }

    let mut output = bottom.clone().into_array();
    let src = top.view();
    let (height, width) = (bottom.height() as i64, bottom.width() as i64);

    for ty in 0..top.height() {
        let y = ty as i64 + offset_y;
        if y < 0 || y >= height {
            continue;
        }
        for tx in 0..top.width() {
            let x = tx as i64 + offset_x;
            if x < 0 || x >= width {
                continue;
            }
            let (y, x) = (y as usize, x as usize);

            let top_a = if top.has_alpha() {
                src[[ty, tx, ALPHA]] as f64 / 255.0
            } else {
                1.0
            };
            let dst_a = if bottom.has_alpha() {
                output[[y, x, ALPHA]] as f64
            } else {
                255.0
            };
            let dst = [
                output[[y, x, 0]] as f64,
                output[[y, x, 1]] as f64,
                output[[y, x, 2]] as f64,
                dst_a,
            ];
            let color = [
                src[[ty, tx, 0]] as f64,
                src[[ty, tx, 1]] as f64,
                src[[ty, tx, 2]] as f64,
            ];

            let blended = blend_over(dst, color, alpha * top_a);
            for c in 0..bottom.channels() {
                output[[y, x, c]] = blended[c].clamp(0.0, 255.0) as u8;
            }
        }
    }

    Ok(PixelBuffer::from_array(output))
}
