//! Rasterops
//!
//! Raster image transformations on 8-bit RGB and RGBA pixel buffers:
//! kernel convolution and the filters built on it, tonal adjustments,
//! geometric transforms and compositing, plus a dispatcher that runs
//! operations by name and chains them.
//!
//! ## Image Format
//! - **RGB**: (height, width, 3) - 3 color channels
//! - **RGBA**: (height, width, 4) - 3 color channels + alpha
//!
//! Samples are `u8` (0-255). Alpha is carried through every filter
//! unchanged; only `composite` writes to it.
//!
//! ## Layout
//! - [`image`] - the [`PixelBuffer`] type
//! - [`filters`] - the transforms themselves
//! - [`ops`] - named operations, the dispatcher and chains
//!
//! Python bindings are available behind the `python` feature.

pub mod error;
pub mod filters;
pub mod image;
pub mod ops;

pub use error::{FilterError, Result};
pub use filters::Kernel;
pub use image::PixelBuffer;
pub use ops::{Dispatcher, KernelSource, Operation, OperationRequest, Params};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::error::FilterError;
    use crate::filters::{self, Kernel};
    use crate::image::PixelBuffer;
    use crate::ops::{self, Operation};

    impl From<FilterError> for PyErr {
        fn from(err: FilterError) -> PyErr {
            PyValueError::new_err(err.to_string())
        }
    }

    fn to_buffer(image: PyReadonlyArray3<'_, u8>) -> PyResult<PixelBuffer> {
        Ok(PixelBuffer::new(image.as_array().to_owned())?)
    }

    fn to_py(py: Python<'_>, image: PixelBuffer) -> Bound<'_, PyArray3<u8>> {
        image.into_array().into_pyarray(py)
    }

    // ========================================================================
    // Convolution
    // ========================================================================

    /// Convolve with a square odd-sized kernel given as rows.
    #[pyfunction]
    #[pyo3(signature = (image, kernel, passes=1))]
    pub fn convolve<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        kernel: Vec<Vec<f64>>,
        passes: i32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let kernel = Kernel::from_rows(kernel)?;
        let result = filters::convolve(&to_buffer(image)?, &kernel, passes)?;
        Ok(to_py(py, result))
    }

    #[pyfunction]
    #[pyo3(signature = (image, radius=filters::blur::DEFAULT_RADIUS, passes=filters::blur::DEFAULT_PASSES))]
    pub fn box_blur<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        radius: i32,
        passes: i32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let result = filters::box_blur(&to_buffer(image)?, radius, passes)?;
        Ok(to_py(py, result))
    }

    #[pyfunction]
    #[pyo3(signature = (image, amount=filters::sharpen::DEFAULT_AMOUNT))]
    pub fn sharpen<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        amount: f64,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let result = filters::sharpen(&to_buffer(image)?, amount)?;
        Ok(to_py(py, result))
    }

    #[pyfunction]
    #[pyo3(signature = (image, cutoff=filters::edge::DEFAULT_EDGE_CUTOFF))]
    pub fn edge<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        cutoff: i32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let result = filters::edge(&to_buffer(image)?, cutoff)?;
        Ok(to_py(py, result))
    }

    // ========================================================================
    // Geometry
    // ========================================================================

    /// Crop to the half-open rectangle `[x1, x2) x [y1, y2)`.
    #[pyfunction]
    pub fn crop<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        x1: i64,
        y1: i64,
        x2: i64,
        y2: i64,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let result = filters::crop(&to_buffer(image)?, x1, y1, x2, y2)?;
        Ok(to_py(py, result))
    }

    #[pyfunction]
    #[pyo3(signature = (image, turns=filters::geometry::DEFAULT_TURNS, ccw=false))]
    pub fn rotate<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        turns: i32,
        ccw: bool,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let result = filters::rotate(&to_buffer(image)?, turns, ccw);
        Ok(to_py(py, result))
    }

    #[pyfunction]
    #[pyo3(signature = (image, vertical=false))]
    pub fn mirror<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        vertical: bool,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let result = filters::mirror(&to_buffer(image)?, vertical);
        Ok(to_py(py, result))
    }

    // ========================================================================
    // Tonal
    // ========================================================================

    #[pyfunction]
    pub fn grayscale<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        Ok(to_py(py, filters::grayscale(&to_buffer(image)?)))
    }

    #[pyfunction]
    pub fn invert<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        Ok(to_py(py, filters::invert(&to_buffer(image)?)))
    }

    #[pyfunction]
    pub fn sepia<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        Ok(to_py(py, filters::sepia(&to_buffer(image)?)))
    }

    #[pyfunction]
    #[pyo3(signature = (image, cutoff=filters::stylize::DEFAULT_THRESHOLD_CUTOFF, binary=false, invert=false))]
    pub fn threshold<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        cutoff: i32,
        binary: bool,
        invert: bool,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let result = filters::threshold(&to_buffer(image)?, cutoff, binary, invert)?;
        Ok(to_py(py, result))
    }

    // ========================================================================
    // Compositing and chains
    // ========================================================================

    #[pyfunction]
    #[pyo3(signature = (bottom, top, alpha=filters::composite::DEFAULT_ALPHA, offset_x=0, offset_y=0))]
    pub fn composite<'py>(
        py: Python<'py>,
        bottom: PyReadonlyArray3<'py, u8>,
        top: PyReadonlyArray3<'py, u8>,
        alpha: f64,
        offset_x: i64,
        offset_y: i64,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let result = filters::composite(&to_buffer(bottom)?, &to_buffer(top)?, alpha, offset_x, offset_y)?;
        Ok(to_py(py, result))
    }

    /// Run operations by name, each with its defaults.
    #[pyfunction]
    pub fn chain<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        operations: Vec<String>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let operations = operations
            .iter()
            .map(|name| name.parse())
            .collect::<Result<Vec<Operation>, FilterError>>()?;
        let result = ops::chain(&to_buffer(image)?, &operations)?;
        Ok(to_py(py, result))
    }

    #[pymodule]
    pub fn rasterops(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(convolve, m)?)?;
        m.add_function(wrap_pyfunction!(box_blur, m)?)?;
        m.add_function(wrap_pyfunction!(sharpen, m)?)?;
        m.add_function(wrap_pyfunction!(edge, m)?)?;

        m.add_function(wrap_pyfunction!(crop, m)?)?;
        m.add_function(wrap_pyfunction!(rotate, m)?)?;
        m.add_function(wrap_pyfunction!(mirror, m)?)?;

        m.add_function(wrap_pyfunction!(grayscale, m)?)?;
        m.add_function(wrap_pyfunction!(invert, m)?)?;
        m.add_function(wrap_pyfunction!(sepia, m)?)?;
        m.add_function(wrap_pyfunction!(threshold, m)?)?;

        m.add_function(wrap_pyfunction!(composite, m)?)?;
        m.add_function(wrap_pyfunction!(chain, m)?)?;
        Ok(())
    }
}
