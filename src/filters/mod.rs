//! Filter modules for image processing effects.
//!
//! ## Supported Formats
//!
//! All filters accept [`PixelBuffer`](crate::image::PixelBuffer)s with 3 or
//! 4 channels:
//!
//! | Format | Shape | Type | Description |
//! |--------|-------|------|-------------|
//! | RGB8 | (H, W, 3) | u8 | Red, green, blue, 0-255 |
//! | RGBA8 | (H, W, 4) | u8 | RGB + alpha, 0-255 |
//!
//! ## Architecture
//!
//! All filters follow these principles:
//! - **Pure** - Every filter returns a new image
//! - **Alpha preservation** - Alpha channel (if present) is never filtered
//! - **Validated parameters** - Out-of-range arguments are errors, not clamps
//!
//! ## Filter Categories
//!
//! - **Convolution**: convolve, box_blur, sharpen, edge
//! - **Tonal**: grayscale, invert, sepia, threshold
//! - **Geometric**: crop, rotate, mirror
//! - **Compositing**: composite

pub mod core;
pub mod convolve;
pub mod blur;
pub mod sharpen;
pub mod edge;
pub mod grayscale;
pub mod color_adjust;
pub mod stylize;
pub mod geometry;
pub mod composite;

pub use self::blur::box_blur;
pub use self::color_adjust::{invert, sepia};
pub use self::composite::composite;
pub use self::convolve::convolve;
pub use self::core::Kernel;
pub use self::edge::edge;
pub use self::geometry::{crop, mirror, rotate};
pub use self::grayscale::grayscale;
pub use self::sharpen::sharpen;
pub use self::stylize::threshold;
