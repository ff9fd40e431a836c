//! Box blur for RGB and RGBA images.
//!
//! Builds a uniform averaging kernel and runs it through the convolution
//! engine, so edges use symmetric reflection rather than clamping.

use super::convolve::convolve;
use super::core::Kernel;
use crate::error::{FilterError, Result};
use crate::image::PixelBuffer;

pub const DEFAULT_RADIUS: i32 = 1;
pub const DEFAULT_PASSES: i32 = 1;
pub const MAX_RADIUS: i32 = 5;

/// Apply box blur to an image.
///
/// # Arguments
/// * `image` - RGB or RGBA image
/// * `radius` - Pixels sampled on each side, 1 to 5
/// * `passes` - Number of times to apply the blur, at least 1
///
/// # Returns
/// Blurred image with alpha preserved
pub fn box_blur(image: &PixelBuffer, radius: i32, passes: i32) -> Result<PixelBuffer> {
    if !(1..=MAX_RADIUS).contains(&radius) {
        return Err(FilterError::parameter(
            "radius",
            format!("must be between 1 and {}, got {}", MAX_RADIUS, radius),
        ));
    }

    let kernel = Kernel::box_blur(radius as usize);
    convolve(image, &kernel, passes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::fixtures::{flat, plane, random, tiny_test};

    #[test]
    fn test_normal_case() {
        let actual = box_blur(&tiny_test(), 1, 1).unwrap();

        assert_eq!(
            plane(&actual, 0),
            vec![vec![0, 85, 170], vec![28, 85, 141], vec![56, 85, 113]]
        );
        assert_eq!(
            plane(&actual, 1),
            vec![vec![0, 28, 56], vec![85, 85, 85], vec![170, 141, 113]]
        );
        assert_eq!(
            plane(&actual, 2),
            vec![vec![255, 198, 141], vec![198, 170, 141], vec![141, 141, 141]]
        );
        assert_eq!(plane(&actual, 3), vec![vec![255; 3]; 3]);
    }

    #[test]
    fn test_radius_bounds() {
        let img = tiny_test();
        for radius in [0, -1, 6] {
            let err = box_blur(&img, radius, 1).unwrap_err();
            assert!(matches!(err, FilterError::InvalidParameter { name: "radius", .. }));
        }
        assert!(box_blur(&img, MAX_RADIUS, 1).is_ok());
    }

    #[test]
    fn test_rejects_zero_passes() {
        let err = box_blur(&tiny_test(), 1, 0).unwrap_err();
        assert!(matches!(err, FilterError::InvalidParameter { name: "passes", .. }));
    }

    #[test]
    fn test_more_passes_smooth_more() {
        let img = random(20, 20, 3, 5);
        let spread = |img: &PixelBuffer| {
            let v = img.channel(0);
            let max = v.iter().copied().max().unwrap_or(0) as i32;
            let min = v.iter().copied().min().unwrap_or(0) as i32;
            max - min
        };
        let once = box_blur(&img, 2, 1).unwrap();
        let thrice = box_blur(&img, 2, 3).unwrap();
        assert!(spread(&thrice) <= spread(&once));
        assert!(spread(&once) < spread(&img));
    }

    #[test]
    fn test_flat_image_stays_close() {
        let img = flat(6, 6, &[120, 60, 30]);
        let result = box_blur(&img, 1, 1).unwrap();
        for (&a, &b) in result.view().iter().zip(img.view().iter()) {
            assert!(a == b || a + 1 == b);
        }
    }
}
