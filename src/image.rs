//! In-memory pixel buffer.
//!
//! ## Layout
//!
//! | Format | Shape | Description |
//! |--------|-------|-------------|
//! | RGB8 | (H, W, 3) | Red, green, blue, 0-255 |
//! | RGBA8 | (H, W, 4) | RGB + straight alpha, 0-255 |
//!
//! Samples are indexed `[row, col, channel]`. Every operation returns a new
//! buffer; inputs are never mutated.

use ndarray::{Array2, Array3, ArrayView2, ArrayView3, Axis};

use crate::error::{FilterError, Result};

/// Index of the alpha channel in RGBA buffers.
pub const ALPHA: usize = 3;

/// A decoded RGB or RGBA image with 8-bit samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Array3<u8>,
}

impl PixelBuffer {
    /// Wrap a `(height, width, channels)` array.
    ///
    /// Fails with `InvalidImage` unless both spatial dimensions are non-zero
    /// and there are 3 or 4 channels.
    pub fn new(data: Array3<u8>) -> Result<Self> {
        let (height, width, channels) = data.dim();
        if height == 0 || width == 0 {
            return Err(FilterError::InvalidImage(format!(
                "image must not be empty, got {}x{}",
                width, height
            )));
        }
        if channels != 3 && channels != 4 {
            return Err(FilterError::InvalidImage(format!(
                "expected 3 or 4 channels, got {}",
                channels
            )));
        }
        Ok(Self { data })
    }

    /// Build from interleaved row-major samples.
    pub fn from_raw(height: usize, width: usize, channels: usize, samples: Vec<u8>) -> Result<Self> {
        let expected = height
            .checked_mul(width)
            .and_then(|n| n.checked_mul(channels))
            .ok_or_else(|| {
                FilterError::InvalidImage(format!(
                    "{}x{}x{} overflows the addressable sample count",
                    width, height, channels
                ))
            })?;
        if samples.len() != expected {
            return Err(FilterError::InvalidImage(format!(
                "expected {} samples for {}x{}x{}, got {}",
                expected,
                width,
                height,
                channels,
                samples.len()
            )));
        }
        let data = Array3::from_shape_vec((height, width, channels), samples)
            .map_err(|e| FilterError::InvalidImage(e.to_string()))?;
        Self::new(data)
    }

    /// Wrap an array produced by an operation that preserves the invariants.
    pub(crate) fn from_array(data: Array3<u8>) -> Self {
        debug_assert!(matches!(data.dim(), (h, w, 3 | 4) if h > 0 && w > 0));
        Self { data }
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn channels(&self) -> usize {
        self.data.dim().2
    }

    pub fn has_alpha(&self) -> bool {
        self.channels() == 4
    }

    pub fn view(&self) -> ArrayView3<'_, u8> {
        self.data.view()
    }

    /// Single channel as a `(height, width)` view.
    pub fn channel(&self, c: usize) -> ArrayView2<'_, u8> {
        self.data.index_axis(Axis(2), c)
    }

    /// Copy of the alpha channel, if any.
    pub fn alpha(&self) -> Option<Array2<u8>> {
        self.has_alpha().then(|| self.channel(ALPHA).to_owned())
    }

    /// True when R, G and B agree at every pixel.
    pub fn is_gray(&self) -> bool {
        self.data
            .lanes(Axis(2))
            .into_iter()
            .all(|px| px[0] == px[1] && px[1] == px[2])
    }

    pub fn into_array(self) -> Array3<u8> {
        self.data
    }

    /// Interleaved row-major samples.
    pub fn into_raw(self) -> Vec<u8> {
        match self.data.as_slice() {
            Some(samples) => samples.to_vec(),
            None => self.data.iter().copied().collect(),
        }
    }
}

/// Build an output image from three colour planes and an optional alpha plane.
///
/// `color` yields the colour value for `(y, x, c)` with `c < 3`.
pub(crate) fn assemble<F>(height: usize, width: usize, alpha: Option<&Array2<u8>>, color: F) -> PixelBuffer
where
    F: Fn(usize, usize, usize) -> u8,
{
    let channels = if alpha.is_some() { 4 } else { 3 };
    let data = Array3::from_shape_fn((height, width, channels), |(y, x, c)| match alpha {
        Some(a) if c == ALPHA => a[[y, x]],
        _ => color(y, x, c),
    });
    PixelBuffer::from_array(data)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// 3x3 RGBA test card, fully opaque.
    pub fn tiny_test() -> PixelBuffer {
        let rgb: [[[u8; 3]; 3]; 3] = [
            [[0, 0, 255], [0, 0, 255], [255, 0, 0]],
            [[0, 0, 255], [0, 0, 255], [255, 255, 255]],
            [[0, 255, 0], [255, 255, 255], [0, 0, 0]],
        ];
        let data = Array3::from_shape_fn((3, 3, 4), |(y, x, c)| if c == ALPHA { 255 } else { rgb[y][x][c] });
        PixelBuffer::new(data).unwrap()
    }

    /// Seeded random image.
    pub fn random(height: usize, width: usize, channels: usize, seed: u64) -> PixelBuffer {
        use rand::{Rng, SeedableRng};
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let samples = (0..height * width * channels).map(|_| rng.random::<u8>()).collect();
        PixelBuffer::from_raw(height, width, channels, samples).unwrap()
    }

    /// Single-colour image.
    pub fn flat(height: usize, width: usize, pixel: &[u8]) -> PixelBuffer {
        let data = Array3::from_shape_fn((height, width, pixel.len()), |(_, _, c)| pixel[c]);
        PixelBuffer::new(data).unwrap()
    }

    /// Extract one channel as nested rows for readable assertions.
    pub fn plane(image: &PixelBuffer, c: usize) -> Vec<Vec<u8>> {
        image
            .channel(c)
            .outer_iter()
            .map(|row| row.to_vec())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_channel_count() {
        let err = PixelBuffer::new(Array3::<u8>::zeros((2, 2, 1))).unwrap_err();
        assert!(matches!(err, FilterError::InvalidImage(_)));
    }

    #[test]
    fn test_rejects_empty() {
        let err = PixelBuffer::new(Array3::<u8>::zeros((0, 4, 3))).unwrap_err();
        assert!(matches!(err, FilterError::InvalidImage(_)));
    }

    #[test]
    fn test_from_raw_length_mismatch() {
        let err = PixelBuffer::from_raw(2, 2, 3, vec![0; 11]).unwrap_err();
        assert!(matches!(err, FilterError::InvalidImage(_)));
    }

    #[test]
    fn test_from_raw_oversized_dimensions() {
        let err = PixelBuffer::from_raw(usize::MAX, 2, 3, vec![0; 6]).unwrap_err();
        assert!(matches!(err, FilterError::InvalidImage(_)));

        let err = PixelBuffer::from_raw(usize::MAX / 2, 1, 4, vec![0; 6]).unwrap_err();
        assert!(matches!(err, FilterError::InvalidImage(_)));
    }

    #[test]
    fn test_raw_roundtrip_keeps_order() {
        let samples: Vec<u8> = (0..24).collect();
        let img = PixelBuffer::from_raw(2, 3, 4, samples.clone()).unwrap();
        assert_eq!(img.view()[[1, 2, 3]], 23);
        assert_eq!(img.view()[[0, 1, 0]], 4);
        assert_eq!(img.into_raw(), samples);
    }

    #[test]
    fn test_alpha_and_gray_detection() {
        let img = fixtures::tiny_test();
        assert!(img.has_alpha());
        assert_eq!(img.alpha().unwrap(), Array2::from_elem((3, 3), 255));
        assert!(!img.is_gray());
        assert!(fixtures::flat(2, 2, &[9, 9, 9]).is_gray());
        assert!(fixtures::flat(2, 2, &[9, 9, 9]).alpha().is_none());
    }
}
