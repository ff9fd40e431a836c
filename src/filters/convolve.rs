//! Convolution engine.
//!
//! Performs true 2-D convolution (kernel flipped on both axes, then
//! correlated) over the colour channels of an RGB or RGBA image.
//!
//! ## Boundary Handling
//!
//! Samples outside the image are produced by symmetric reflection: the edge
//! pixel is repeated once and the interior is mirrored beyond it
//! (`d c b a | a b c d | d c b a`). Kernels wider than the image keep
//! reflecting, so every edge and corner is well defined.
//!
//! ## Precision
//!
//! Work is done in `f64`. Passes feed each other unrounded; the final plane is
//! clamped to 0-255 and truncated to `u8`. Rows are computed in parallel but
//! each pixel sums its footprint in a fixed order, so results do not depend on
//! scheduling.

use ndarray::ArrayView2;
use rayon::prelude::*;
use tracing::trace;

use super::core::Kernel;
use crate::error::{FilterError, Result};
use crate::image::{assemble, PixelBuffer};

/// A single floating-point channel, row-major.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Plane {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f64>,
}

impl Plane {
    pub fn from_channel(channel: ArrayView2<u8>) -> Self {
        let (height, width) = channel.dim();
        Self {
            width,
            height,
            data: channel.iter().map(|&v| v as f64).collect(),
        }
    }

    #[inline]
    pub fn get(&self, y: usize, x: usize) -> f64 {
        self.data[y * self.width + x]
    }

    /// Clamp to 0-255 and truncate.
    #[inline]
    pub fn sample_u8(&self, y: usize, x: usize) -> u8 {
        self.get(y, x).clamp(0.0, 255.0) as u8
    }
}

/// Map an out-of-range index back into `0..len` by symmetric reflection.
#[inline]
fn reflect(i: isize, len: usize) -> usize {
    let len = len as isize;
    let period = 2 * len;
    let m = i.rem_euclid(period);
    (if m >= len { period - 1 - m } else { m }) as usize
}

/// Source index for each output position and kernel tap along one axis.
///
/// Taps run from `-radius` to `+radius`, `2 * radius + 1` per position.
fn reflect_table(len: usize, radius: usize) -> Vec<usize> {
    let r = radius as isize;
    (0..len)
        .flat_map(|i| (-r..=r).map(move |k| reflect(i as isize + k, len)))
        .collect()
}

/// One full correlation of `plane` with an already flipped kernel.
fn correlate(plane: &Plane, flipped: &[f64], radius: usize) -> Plane {
    let (width, height) = (plane.width, plane.height);
    let size = 2 * radius + 1;
    let rows = reflect_table(height, radius);
    let cols = reflect_table(width, radius);

    let mut data = vec![0.0f64; width * height];
    data.par_chunks_mut(width).enumerate().for_each(|(y, out_row)| {
        let src_rows = &rows[y * size..(y + 1) * size];
        for (x, out) in out_row.iter_mut().enumerate() {
            let src_cols = &cols[x * size..(x + 1) * size];
            let mut sum = 0.0f64;
            for (ky, &sy) in src_rows.iter().enumerate() {
                let weights = &flipped[ky * size..(ky + 1) * size];
                for (&sx, &w) in src_cols.iter().zip(weights) {
                    sum += plane.get(sy, sx) * w;
                }
            }
            *out = sum;
        }
    });

    Plane { width, height, data }
}

/// Convolve a plane `passes` times without clamping.
pub(crate) fn convolve_plane(plane: Plane, kernel: &Kernel, passes: usize) -> Plane {
    let radius = kernel.radius();
    let flipped: Vec<f64> = kernel.flipped().iter().copied().collect();
    (0..passes).fold(plane, |acc, _| correlate(&acc, &flipped, radius))
}

pub(crate) fn check_passes(passes: i32) -> Result<usize> {
    if passes < 1 {
        return Err(FilterError::parameter(
            "passes",
            format!("must be a positive integer, got {}", passes),
        ));
    }
    Ok(passes as usize)
}

/// Convolve the colour channels of an image with a kernel.
///
/// # Arguments
/// * `image` - RGB or RGBA image
/// * `kernel` - Square, odd-sized kernel (flipped internally)
/// * `passes` - Number of successive convolutions, at least 1
///
/// # Returns
/// Image of the same shape; alpha, if present, is copied unchanged.
pub fn convolve(image: &PixelBuffer, kernel: &Kernel, passes: i32) -> Result<PixelBuffer> {
    let passes = check_passes(passes)?;
    let (height, width) = (image.height(), image.width());
    trace!(width, height, kernel_size = kernel.size(), passes, "convolve");

    // Identical colour channels only need one plane
    let planes: Vec<Plane> = if image.is_gray() {
        vec![convolve_plane(Plane::from_channel(image.channel(0)), kernel, passes)]
    } else {
        (0..3)
            .map(|c| convolve_plane(Plane::from_channel(image.channel(c)), kernel, passes))
            .collect()
    };

    let alpha = image.alpha();
    Ok(assemble(height, width, alpha.as_ref(), |y, x, c| {
        planes[c.min(planes.len() - 1)].sample_u8(y, x)
    }))
}
