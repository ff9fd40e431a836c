//! Sharpening by unsharp masking.
//!
//! The kernel amplifies the difference between each pixel and the average of
//! its four orthogonal neighbours:
//!
//! ```text
//!  0      -a/5       0
//! -a/5   1+4a/5    -a/5
//!  0      -a/5       0
//! ```
//! where a = amount

use super::convolve::convolve;
use super::core::Kernel;
use crate::error::{FilterError, Result};
use crate::image::PixelBuffer;

pub const DEFAULT_AMOUNT: f64 = 3.0;

/// Sharpen an image.
///
/// # Arguments
/// * `image` - RGB or RGBA image
/// * `amount` - Strength multiplier, must be positive
///
/// # Returns
/// Sharpened image with alpha preserved
pub fn sharpen(image: &PixelBuffer, amount: f64) -> Result<PixelBuffer> {
    if !(amount.is_finite() && amount > 0.0) {
        return Err(FilterError::parameter(
            "amount",
            format!("must be a positive number, got {}", amount),
        ));
    }

    convolve(image, &Kernel::unsharp_mask(amount), 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::fixtures::{flat, plane};
    use ndarray::Array3;

    fn step_edge() -> PixelBuffer {
        let mut img = Array3::<u8>::zeros((5, 6, 4));
        for y in 0..5 {
            for x in 0..6 {
                let v = if x < 3 { 100 } else { 150 };
                img[[y, x, 0]] = v;
                img[[y, x, 1]] = v;
                img[[y, x, 2]] = v;
                img[[y, x, 3]] = 200;
            }
        }
        PixelBuffer::new(img).unwrap()
    }

    #[test]
    fn test_flat_image_unchanged() {
        let img = flat(4, 4, &[100, 100, 100]);
        let result = sharpen(&img, DEFAULT_AMOUNT).unwrap();
        for (&a, &b) in result.view().iter().zip(img.view().iter()) {
            assert!(a == b || a + 1 == b);
        }
    }

    #[test]
    fn test_increases_edge_contrast() {
        let img = step_edge();
        let result = sharpen(&img, DEFAULT_AMOUNT).unwrap();
        let row = &plane(&result, 0)[2];

        assert!(row[2] < 100, "dark side should darken, got {}", row[2]);
        assert!(row[3] > 150, "bright side should brighten, got {}", row[3]);
        assert_eq!(plane(&result, 3), vec![vec![200; 6]; 5]);
    }

    #[test]
    fn test_stronger_amount_more_contrast() {
        let img = step_edge();
        let mild = sharpen(&img, 1.0).unwrap();
        let strong = sharpen(&img, 5.0).unwrap();
        assert!(plane(&strong, 0)[2][3] > plane(&mild, 0)[2][3]);
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        let img = step_edge();
        for amount in [0.0, -2.0, f64::NAN] {
            let err = sharpen(&img, amount).unwrap_err();
            assert!(matches!(err, FilterError::InvalidParameter { name: "amount", .. }));
        }
    }
}
