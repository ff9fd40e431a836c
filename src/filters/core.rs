//! Core utilities shared by multiple filters:
//! - Kernel validation and generation
//! - Colour blending

use ndarray::{arr2, Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::{FilterError, Result};

/// Square, odd-sized convolution kernel.
///
/// Weights are stored as written; the convolution engine flips them on both
/// axes before correlating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct Kernel {
    weights: Array2<f64>,
}

impl Kernel {
    /// Validate and wrap a weight grid.
    ///
    /// Fails with `InvalidKernel` if the grid is not square, has an even side,
    /// is empty, or holds a non-finite weight.
    pub fn new(weights: Array2<f64>) -> Result<Self> {
        let (rows, cols) = weights.dim();
        if rows != cols {
            return Err(FilterError::InvalidKernel(format!(
                "kernel must be square, got {}x{}",
                rows, cols
            )));
        }
        if rows % 2 == 0 {
            return Err(FilterError::InvalidKernel(format!(
                "kernel must be odd-sized, got {}x{}",
                rows, cols
            )));
        }
        if weights.iter().any(|w| !w.is_finite()) {
            return Err(FilterError::InvalidKernel("kernel weights must be finite".into()));
        }
        Ok(Self { weights })
    }

    /// Build from a list of rows, as supplied by a prompt or file.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let size = rows.len();
        if let Some(row) = rows.iter().find(|r| r.len() != size) {
            return Err(FilterError::InvalidKernel(format!(
                "kernel must be square, got a row of {} in a {}-row kernel",
                row.len(),
                size
            )));
        }
        let weights = Array2::from_shape_fn((size, size), |(y, x)| rows[y][x]);
        Self::new(weights)
    }

    /// 1 at the centre, 0 elsewhere.
    pub fn identity(size: usize) -> Result<Self> {
        let half = size / 2;
        Self::new(Array2::from_shape_fn((size, size), |(y, x)| {
            if y == half && x == half {
                1.0
            } else {
                0.0
            }
        }))
    }

    /// Uniform `(2r+1)^2` averaging kernel.
    pub fn box_blur(radius: usize) -> Self {
        let size = radius * 2 + 1;
        let weight = 1.0 / (size * size) as f64;
        Self {
            weights: Array2::from_elem((size, size), weight),
        }
    }

    /// 3x3 binomial approximation of a Gaussian.
    pub fn gaussian_3x3() -> Self {
        Self {
            weights: arr2(&[[1.0, 2.0, 1.0], [2.0, 4.0, 2.0], [1.0, 2.0, 1.0]]) / 16.0,
        }
    }

    /// Horizontal Sobel operator.
    pub fn sobel_x() -> Self {
        Self {
            weights: arr2(&[[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]]),
        }
    }

    /// Vertical Sobel operator.
    pub fn sobel_y() -> Self {
        Self {
            weights: arr2(&[[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]]),
        }
    }

    /// Unsharp-mask kernel `O + (O - B) * amount`.
    ///
    /// `O` is the 3x3 identity and `B` averages the centre with its four
    /// orthogonal neighbours.
    pub fn unsharp_mask(amount: f64) -> Self {
        let original = arr2(&[[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]]);
        let blurred = arr2(&[[0.0, 1.0, 0.0], [1.0, 1.0, 1.0], [0.0, 1.0, 0.0]]) / 5.0;
        Self {
            weights: &original + &((&original - &blurred) * amount),
        }
    }

    pub fn size(&self) -> usize {
        self.weights.nrows()
    }

    pub fn radius(&self) -> usize {
        self.size() / 2
    }

    pub fn weights(&self) -> ArrayView2<'_, f64> {
        self.weights.view()
    }

    /// Weights rotated 180 degrees, ready for correlation.
    pub(crate) fn flipped(&self) -> Array2<f64> {
        let n = self.size();
        Array2::from_shape_fn((n, n), |(y, x)| self.weights[[n - 1 - y, n - 1 - x]])
    }
}

impl TryFrom<Vec<Vec<f64>>> for Kernel {
    type Error = FilterError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self> {
        Self::from_rows(rows)
    }
}

impl From<Kernel> for Vec<Vec<f64>> {
    fn from(kernel: Kernel) -> Self {
        kernel.weights.outer_iter().map(|row| row.to_vec()).collect()
    }
}

/// Blend a colour onto an existing pixel using Porter-Duff "over".
///
/// `dst` holds straight RGBA in 0-255, `src_a` is the source opacity in
/// 0.0-1.0. Returns the blended pixel.
#[inline]
pub fn blend_over(dst: [f64; 4], src: [f64; 3], src_a: f64) -> [f64; 4] {
    if src_a <= 0.0 {
        return dst;
    }
    if src_a >= 1.0 {
        return [src[0], src[1], src[2], 255.0];
    }

    let dst_a = dst[3] / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    if out_a <= 0.0 {
        return [0.0; 4];
    }

    let mix = |s: f64, d: f64| (s * src_a + d * dst_a * (1.0 - src_a)) / out_a;
    [
        mix(src[0], dst[0]),
        mix(src[1], dst[1]),
        mix(src[2], dst[2]),
        out_a * 255.0,
    ]
}
