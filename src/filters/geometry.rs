//! Geometric operations: crop, quarter-turn rotation, mirroring.
//!
//! ## Rotation Direction
//!
//! - 90° CW: (x, y) -> (H - 1 - y, x)
//! - 180°: (x, y) -> (W - 1 - x, H - 1 - y)
//! - 270° CW (90° CCW): (x, y) -> (y, W - 1 - x)
//!
//! ## Crop Coordinates
//!
//! Crop regions are half-open: `(x1, y1)` is the first column/row kept,
//! `(x2, y2)` is one past the last.

use ndarray::{s, Array3, ArrayView3};

use crate::error::{FilterError, Result};
use crate::image::PixelBuffer;

pub const DEFAULT_TURNS: i32 = 1;

// ============================================================================
// Crop
// ============================================================================

/// Crop the image to `[x1, x2) x [y1, y2)`.
///
/// Fails with `InvalidCoordinates` if a corner lies outside the image, the
/// corners are out of order, or the region is empty.
pub fn crop(image: &PixelBuffer, x1: i64, y1: i64, x2: i64, y2: i64) -> Result<PixelBuffer> {
    let width = image.width() as i64;
    let height = image.height() as i64;

    let in_bounds = |x: i64, y: i64| (0..=width).contains(&x) && (0..=height).contains(&y);
    if !in_bounds(x1, y1) {
        return Err(FilterError::InvalidCoordinates(format!(
            "({}, {}) is out of bounds",
            x1, y1
        )));
    }
    if !in_bounds(x2, y2) {
        return Err(FilterError::InvalidCoordinates(format!(
            "({}, {}) is out of bounds",
            x2, y2
        )));
    }
    if x1 > x2 || y1 > y2 {
        return Err(FilterError::InvalidCoordinates(format!(
            "({}, {}) is not above and to the left of ({}, {})",
            x1, y1, x2, y2
        )));
    }
    if x1 == x2 {
        return Err(FilterError::InvalidCoordinates(
            "specified region has a width of 0 pixels".into(),
        ));
    }
    if y1 == y2 {
        return Err(FilterError::InvalidCoordinates(
            "specified region has a height of 0 pixels".into(),
        ));
    }

    let (x1, y1, x2, y2) = (x1 as usize, y1 as usize, x2 as usize, y2 as usize);
    Ok(PixelBuffer::from_array(
        image.view().slice(s![y1..y2, x1..x2, ..]).to_owned(),
    ))
}

// ============================================================================
// Rotate
// ============================================================================

fn rotate_90_cw(image: ArrayView3<u8>) -> Array3<u8> {
    let (h, w, c) = image.dim();
    // new (row, col) = (x, h - 1 - y)
    Array3::from_shape_fn((w, h, c), |(ny, nx, ch)| image[[h - 1 - nx, ny, ch]])
}

fn rotate_180(image: ArrayView3<u8>) -> Array3<u8> {
    image.slice(s![..;-1, ..;-1, ..]).to_owned()
}

fn rotate_270_cw(image: ArrayView3<u8>) -> Array3<u8> {
    let (h, w, c) = image.dim();
    // new (row, col) = (w - 1 - x, y)
    Array3::from_shape_fn((w, h, c), |(ny, nx, ch)| image[[nx, w - 1 - ny, ch]])
}

/// Rotate the image in 90 degree steps.
///
/// # Arguments
/// * `image` - Input image
/// * `turns` - Number of quarter turns; negative values turn the other way
/// * `ccw` - Turn counter-clockwise instead of clockwise
///
/// # Returns
/// Rotated image; width and height swap for odd turn counts
pub fn rotate(image: &PixelBuffer, turns: i32, ccw: bool) -> PixelBuffer {
    let signed = if ccw { -(turns as i64) } else { turns as i64 };
    let cw_turns = signed.rem_euclid(4);
    let view = image.view();
    match cw_turns {
        1 => PixelBuffer::from_array(rotate_90_cw(view)),
        2 => PixelBuffer::from_array(rotate_180(view)),
        3 => PixelBuffer::from_array(rotate_270_cw(view)),
        _ => image.clone(),
    }
}

// ============================================================================
// Mirror
// ============================================================================

/// Mirror the image.
///
/// With `vertical` the image is flipped top-to-bottom, otherwise
/// left-to-right.
pub fn mirror(image: &PixelBuffer, vertical: bool) -> PixelBuffer {
    let view = image.view();
    let flipped = if vertical {
        view.slice(s![..;-1, .., ..]).to_owned()
    } else {
        view.slice(s![.., ..;-1, ..]).to_owned()
    };
    PixelBuffer::from_array(flipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::fixtures::{random, tiny_test};
    use ndarray::Array3;

    /// 2x3 RGB image whose red channel counts 1..=6 row by row.
    fn counting() -> PixelBuffer {
        let img = Array3::from_shape_fn((2, 3, 3), |(y, x, c)| if c == 0 { (y * 3 + x + 1) as u8 } else { 0 });
        PixelBuffer::new(img).unwrap()
    }

    fn red(image: &PixelBuffer) -> Vec<Vec<u8>> {
        crate::image::fixtures::plane(image, 0)
    }

    #[test]
    fn test_no_crop() {
        let img = tiny_test();
        assert_eq!(crop(&img, 0, 0, 3, 3).unwrap(), img);
    }

    #[test]
    fn test_centre_crop() {
        let actual = crop(&tiny_test(), 1, 1, 2, 2).unwrap();
        assert_eq!(actual.into_raw(), vec![0, 0, 255, 255]);
    }

    #[test]
    fn test_crop_to_right_edge() {
        let actual = crop(&tiny_test(), 2, 0, 3, 3).unwrap();
        assert_eq!((actual.height(), actual.width()), (3, 1));
        assert_eq!(
            actual.into_raw(),
            vec![255, 0, 0, 255, 255, 255, 255, 255, 0, 0, 0, 255]
        );
    }

    #[test]
    fn test_crop_invalid() {
        let img = tiny_test();
        let cases = [
            (-1, 0, 2, 2),
            (0, 0, 4, 3),
            (0, 0, 3, 4),
            (2, 0, 1, 3),
            (0, 2, 3, 1),
            (1, 0, 1, 3),
            (0, 1, 3, 1),
        ];
        for (x1, y1, x2, y2) in cases {
            let err = crop(&img, x1, y1, x2, y2).unwrap_err();
            assert!(
                matches!(err, FilterError::InvalidCoordinates(_)),
                "({}, {}, {}, {}) gave {:?}",
                x1,
                y1,
                x2,
                y2,
                err
            );
        }
    }

    #[test]
    fn test_rotate_cw() {
        let result = rotate(&counting(), 1, false);
        assert_eq!(red(&result), vec![vec![4, 1], vec![5, 2], vec![6, 3]]);
    }

    #[test]
    fn test_rotate_ccw() {
        let result = rotate(&counting(), 1, true);
        assert_eq!(red(&result), vec![vec![3, 6], vec![2, 5], vec![1, 4]]);
    }

    #[test]
    fn test_rotate_180() {
        let result = rotate(&counting(), 2, false);
        assert_eq!(red(&result), vec![vec![6, 5, 4], vec![3, 2, 1]]);
    }

    #[test]
    fn test_four_turns_identity() {
        let img = random(5, 8, 4, 2);
        assert_eq!(rotate(&img, 4, false), img);
        assert_eq!(rotate(&img, 4, true), img);
    }

    #[test]
    fn test_cw_then_ccw_identity() {
        let img = random(5, 8, 3, 4);
        for n in 1..=5 {
            assert_eq!(rotate(&rotate(&img, n, false), n, true), img);
        }
    }

    #[test]
    fn test_negative_turns_reverse_direction() {
        let img = random(3, 7, 4, 6);
        assert_eq!(rotate(&img, 1, false), rotate(&img, -1, true));
        assert_eq!(rotate(&img, -3, false), rotate(&img, 1, false));
    }

    #[test]
    fn test_mirror_horizontal() {
        let result = mirror(&counting(), false);
        assert_eq!(red(&result), vec![vec![3, 2, 1], vec![6, 5, 4]]);
    }

    #[test]
    fn test_mirror_vertical() {
        let result = mirror(&counting(), true);
        assert_eq!(red(&result), vec![vec![4, 5, 6], vec![1, 2, 3]]);
    }

    #[test]
    fn test_mirror_is_involution() {
        let img = random(6, 9, 4, 8);
        assert_eq!(mirror(&mirror(&img, false), false), img);
        assert_eq!(mirror(&mirror(&img, true), true), img);
    }
}
