//! Stylize filters: Threshold.
//!
//! Processes the three colour channels independently; alpha is preserved.

use super::grayscale::grayscale;
use crate::error::{FilterError, Result};
use crate::image::{assemble, PixelBuffer};

pub const DEFAULT_THRESHOLD_CUTOFF: i32 = 128;

pub(crate) fn check_cutoff(cutoff: i32) -> Result<f64> {
    if !(0..=255).contains(&cutoff) {
        return Err(FilterError::parameter(
            "cutoff",
            format!("must be in the range [0, 255], got {}", cutoff),
        ));
    }
    Ok(cutoff as f64)
}

/// 255 at or above the cutoff, 0 below.
#[inline]
pub(crate) fn step(v: f64, cutoff: f64) -> u8 {
    if v < cutoff {
        0
    } else {
        255
    }
}

/// Apply a threshold to an image.
///
/// # Arguments
/// * `image` - RGB or RGBA image
/// * `cutoff` - Threshold value (0-255); samples >= cutoff become 255
/// * `binary` - Convert to grayscale first, giving black-and-white output
/// * `invert` - Swap black and white after thresholding
///
/// # Returns
/// Image whose colour samples are all 0 or 255
pub fn threshold(image: &PixelBuffer, cutoff: i32, binary: bool, invert: bool) -> Result<PixelBuffer> {
    let cutoff = check_cutoff(cutoff)?;

    let gray;
    let source = if binary {
        gray = grayscale(image);
        &gray
    } else {
        image
    };

    let input = source.view();
    let alpha = image.alpha();
    Ok(assemble(image.height(), image.width(), alpha.as_ref(), |y, x, c| {
        let v = step(input[[y, x, c]] as f64, cutoff);
        if invert {
            255 - v
        } else {
            v
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::fixtures::{flat, plane, random, tiny_test};

    #[test]
    fn test_only_extremes() {
        let img = random(16, 16, 4, 9);
        for cutoff in [0, 1, 64, 128, 200, 255] {
            let result = threshold(&img, cutoff, false, false).unwrap();
            for c in 0..3 {
                assert!(result.channel(c).iter().all(|&v| v == 0 || v == 255));
            }
            assert_eq!(result.channel(3), img.channel(3));
        }
    }

    #[test]
    fn test_cutoff_is_inclusive() {
        let img = flat(1, 1, &[127, 128, 129]);
        let result = threshold(&img, 128, false, false).unwrap();
        assert_eq!(result.view().iter().copied().collect::<Vec<_>>(), vec![0, 255, 255]);
    }

    #[test]
    fn test_channels_independent() {
        let result = threshold(&tiny_test(), 128, false, false).unwrap();
        assert_eq!(plane(&result, 1)[2], vec![255, 255, 0]);
        assert_eq!(plane(&result, 2)[2], vec![0, 255, 0]);
    }

    #[test]
    fn test_binary_collapses_colour() {
        let result = threshold(&tiny_test(), 100, true, false).unwrap();
        assert!(result.is_gray());
        // pure green has luma 149, pure blue 29
        assert_eq!(result.view()[[2, 0, 0]], 255);
        assert_eq!(result.view()[[0, 0, 0]], 0);
    }

    #[test]
    fn test_invert_flips_colour_only() {
        let img = flat(2, 2, &[10, 200, 128, 77]);
        let result = threshold(&img, 128, false, true).unwrap();
        assert_eq!(
            result.view().iter().take(4).copied().collect::<Vec<_>>(),
            vec![255, 0, 0, 77]
        );
    }

    #[test]
    fn test_rejects_out_of_range_cutoff() {
        for cutoff in [-1, 256] {
            let err = threshold(&tiny_test(), cutoff, false, false).unwrap_err();
            assert!(matches!(err, FilterError::InvalidParameter { name: "cutoff", .. }));
        }
    }
}
