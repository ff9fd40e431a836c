//! Sequential application of operations.
//!
//! A chain runs each step with default parameters, feeding every result into
//! the next step. The whole list is validated before any pixel is touched, so
//! a chain either runs completely or fails without output.

use tracing::debug;

use super::dispatch::Dispatcher;
use super::Operation;
use crate::error::{FilterError, Result};
use crate::image::PixelBuffer;

impl Dispatcher<'_> {
    /// Apply `operations` in order, each with its defaults.
    ///
    /// # Errors
    /// * `InvalidParameter` - the list is empty
    /// * `UnsupportedInChain` - the first step that is `chain`, `crop` or
    ///   `composite`
    pub fn chain(&mut self, image: &PixelBuffer, operations: &[Operation]) -> Result<PixelBuffer> {
        if operations.is_empty() {
            return Err(FilterError::parameter("operations", "chain needs at least one operation"));
        }
        if let Some(&op) = operations.iter().find(|op| !op.is_chainable()) {
            return Err(FilterError::UnsupportedInChain(op));
        }

        debug!(steps = operations.len(), "running chain");
        let mut current = image.clone();
        for &op in operations {
            current = self.apply_with_defaults(&current, op)?;
        }
        Ok(current)
    }

    /// Like [`Dispatcher::chain`], with steps given by identifier.
    ///
    /// Every identifier is resolved before the first step runs.
    pub fn chain_names<S: AsRef<str>>(&mut self, image: &PixelBuffer, names: &[S]) -> Result<PixelBuffer> {
        let operations = names
            .iter()
            .map(|name| name.as_ref().parse())
            .collect::<Result<Vec<Operation>>>()?;
        self.chain(image, &operations)
    }
}

/// Apply `operations` in order with a dispatcher that has no kernel source.
pub fn chain(image: &PixelBuffer, operations: &[Operation]) -> Result<PixelBuffer> {
    Dispatcher::new().chain(image, operations)
}
