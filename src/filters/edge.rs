//! Edge detection: Sobel gradient magnitude with noise suppression.
//!
//! Pipeline:
//! 1. Grayscale (three identical channels)
//! 2. 3x3 approximate Gaussian, 2 passes
//! 3. Sobel X and Sobel Y, one pass each, kept as signed floats
//! 4. Gradient magnitude `sqrt(gx^2 + gy^2)`
//! 5. Normalize by the global maximum to 0-255
//! 6. Threshold at `cutoff`
//!
//! Output is black with white edges; alpha is preserved.

use tracing::trace;

use super::convolve::{convolve, convolve_plane, Plane};
use super::core::Kernel;
use super::grayscale::grayscale;
use super::stylize::{check_cutoff, step};
use crate::error::Result;
use crate::image::{assemble, PixelBuffer};

pub const DEFAULT_EDGE_CUTOFF: i32 = 150;

/// Passes of the smoothing kernel before gradients are taken.
const SMOOTHING_PASSES: i32 = 2;

/// Detect edges in an image.
///
/// # Arguments
/// * `image` - RGB or RGBA image
/// * `cutoff` - Threshold (0-255) on the normalized gradient; lower keeps
///   more edges
///
/// # Returns
/// Image with colour channels 255 on edges and 0 elsewhere
pub fn edge(image: &PixelBuffer, cutoff: i32) -> Result<PixelBuffer> {
    let cutoff = check_cutoff(cutoff)?;

    let smoothed = convolve(&grayscale(image), &Kernel::gaussian_3x3(), SMOOTHING_PASSES)?;
    let luma = Plane::from_channel(smoothed.channel(0));

    let gx = convolve_plane(luma.clone(), &Kernel::sobel_x(), 1);
    let gy = convolve_plane(luma, &Kernel::sobel_y(), 1);

    let magnitude: Vec<f64> = gx
        .data
        .iter()
        .zip(&gy.data)
        .map(|(x, y)| (x * x + y * y).sqrt())
        .collect();
    let max = magnitude.iter().copied().fold(0.0f64, f64::max);
    trace!(max, "edge gradient");

    let width = image.width();
    let alpha = image.alpha();
    Ok(assemble(image.height(), width, alpha.as_ref(), |y, x, _| {
        // A flat image has no edges at any cutoff
        if max <= 0.0 {
            return 0;
        }
        let v = (magnitude[y * width + x] / max * 255.0).clamp(0.0, 255.0);
        step(v, cutoff)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FilterError;
    use crate::image::fixtures::{flat, plane, random};
    use ndarray::Array3;

    #[test]
    fn test_flat_is_zero() {
        for cutoff in [0, 150, 255] {
            let result = edge(&flat(8, 8, &[90, 160, 30, 255]), cutoff).unwrap();
            for c in 0..3 {
                assert!(result.channel(c).iter().all(|&v| v == 0));
            }
            assert!(result.channel(3).iter().all(|&a| a == 255));
        }
    }

    #[test]
    fn test_detects_vertical_edge() {
        let img = Array3::from_shape_fn((9, 10, 3), |(_, x, _)| if x < 5 { 0u8 } else { 255 });
        let result = edge(&PixelBuffer::new(img).unwrap(), DEFAULT_EDGE_CUTOFF).unwrap();
        let red = plane(&result, 0);

        // Strongest response straddles the step, none far from it
        for row in &red {
            assert_eq!(row[4], 255);
            assert_eq!(row[5], 255);
            assert_eq!(row[0], 0);
            assert_eq!(row[9], 0);
        }
        assert!(result.is_gray());
    }

    #[test]
    fn test_detects_falling_edge() {
        // negative gradients count as much as positive ones
        let img = Array3::from_shape_fn((9, 10, 3), |(_, x, _)| if x < 5 { 255u8 } else { 0 });
        let result = edge(&PixelBuffer::new(img).unwrap(), DEFAULT_EDGE_CUTOFF).unwrap();
        let red = plane(&result, 0);

        for row in &red {
            assert_eq!(row[4], 255);
            assert_eq!(row[5], 255);
            assert_eq!(row[0], 0);
            assert_eq!(row[9], 0);
        }
    }

    #[test]
    fn test_detects_horizontal_edge() {
        let img = Array3::from_shape_fn((10, 6, 4), |(y, _, c)| match c {
            3 => 128u8,
            _ if y < 5 => 40,
            _ => 220,
        });
        let result = edge(&PixelBuffer::new(img).unwrap(), DEFAULT_EDGE_CUTOFF).unwrap();
        let red = plane(&result, 0);

        assert!(red[4].iter().all(|&v| v == 255));
        assert!(red[0].iter().all(|&v| v == 0));
        assert!(result.channel(3).iter().all(|&a| a == 128));
    }

    #[test]
    fn test_only_extremes() {
        let result = edge(&random(20, 20, 3, 13), 60).unwrap();
        assert!(result.view().iter().all(|&v| v == 0 || v == 255));
    }

    #[test]
    fn test_lower_cutoff_keeps_more() {
        let img = random(24, 24, 3, 17);
        let count = |cutoff| {
            edge(&img, cutoff)
                .unwrap()
                .channel(0)
                .iter()
                .filter(|&&v| v == 255)
                .count()
        };
        assert!(count(30) >= count(200));
        // the strongest gradient normalizes to exactly 255
        assert!(count(255) >= 1);
    }

    #[test]
    fn test_rejects_out_of_range_cutoff() {
        let err = edge(&flat(3, 3, &[0, 0, 0]), 300).unwrap_err();
        assert!(matches!(err, FilterError::InvalidParameter { name: "cutoff", .. }));
    }
}
