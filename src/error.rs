//! Error type shared by every filter and the dispatcher.

use thiserror::Error;

use crate::ops::Operation;

/// Failures raised by image operations.
///
/// All variants describe deterministic validation failures detected at the
/// point of the offending call; nothing here is transient.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("invalid kernel: {0}")]
    InvalidKernel(String),

    #[error("invalid {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("unrecognized operation: {0}")]
    UnknownOperation(String),

    #[error("{0} operation requires arguments")]
    MissingParameters(Operation),

    #[error("operation {0} is not supported in chain mode")]
    UnsupportedInChain(Operation),
}

impl FilterError {
    pub(crate) fn parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FilterError>;
