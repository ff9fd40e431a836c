//! Named operations and their parameters.
//!
//! An [`OperationRequest`] pairs an [`Operation`] identifier with a
//! [`Params`] bundle whose fields are all optional. Omitted fields resolve to
//! each filter's documented default when the request is dispatched.
//!
//! Requests are plain serde data, e.g. in JSON:
//!
//! ```json
//! { "operation": "boxblur", "params": { "radius": 2, "passes": 3 } }
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FilterError;
use crate::filters::Kernel;
use crate::image::PixelBuffer;

pub mod chain;
pub mod dispatch;

pub use self::chain::chain;
pub use self::dispatch::{apply, Dispatcher, KernelSource, DEFAULT_KERNEL_SIZE};

/// Closed set of operation identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Operation {
    BoxBlur,
    Chain,
    Composite,
    Crop,
    Edge,
    Grayscale,
    Invert,
    Convolve,
    MirrorH,
    MirrorV,
    RotateCW,
    RotateCCW,
    Sepia,
    Sharpen,
    Threshold,
}

impl Operation {
    pub const ALL: [Operation; 15] = [
        Operation::BoxBlur,
        Operation::Chain,
        Operation::Composite,
        Operation::Crop,
        Operation::Edge,
        Operation::Grayscale,
        Operation::Invert,
        Operation::Convolve,
        Operation::MirrorH,
        Operation::MirrorV,
        Operation::RotateCW,
        Operation::RotateCCW,
        Operation::Sepia,
        Operation::Sharpen,
        Operation::Threshold,
    ];

    /// Identifier as accepted on the command surface.
    pub fn name(self) -> &'static str {
        match self {
            Operation::BoxBlur => "boxblur",
            Operation::Chain => "chain",
            Operation::Composite => "composite",
            Operation::Crop => "crop",
            Operation::Edge => "edge",
            Operation::Grayscale => "grayscale",
            Operation::Invert => "invert",
            Operation::Convolve => "convolve",
            Operation::MirrorH => "mirrorH",
            Operation::MirrorV => "mirrorV",
            Operation::RotateCW => "rotateCW",
            Operation::RotateCCW => "rotateCCW",
            Operation::Sepia => "sepia",
            Operation::Sharpen => "sharpen",
            Operation::Threshold => "threshold",
        }
    }

    /// Whether the operation may appear inside a chain.
    ///
    /// Chains run every step with default arguments, which rules out the
    /// chain itself and the operations needing explicit input.
    pub fn is_chainable(self) -> bool {
        !matches!(self, Operation::Chain | Operation::Crop | Operation::Composite)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| FilterError::UnknownOperation(s.to_string()))
    }
}

impl TryFrom<String> for Operation {
    type Error = FilterError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Operation> for String {
    fn from(op: Operation) -> Self {
        op.name().to_string()
    }
}

/// Optional arguments for any operation.
///
/// Each operation reads only the fields it understands.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Params {
    /// boxblur
    pub radius: Option<i32>,
    /// boxblur, convolve
    pub passes: Option<i32>,
    /// edge, threshold
    pub cutoff: Option<i32>,
    /// threshold
    pub binary: Option<bool>,
    /// threshold
    pub invert: Option<bool>,
    /// sharpen
    pub amount: Option<f64>,
    /// rotateCW, rotateCCW
    pub turns: Option<i32>,
    /// crop
    pub x1: Option<i64>,
    pub y1: Option<i64>,
    pub x2: Option<i64>,
    pub y2: Option<i64>,
    /// convolve; when absent the dispatcher's kernel source is asked
    pub kernel: Option<Kernel>,
    /// convolve, side of the kernel requested from the kernel source
    pub kernel_size: Option<usize>,
    /// chain
    pub operations: Option<Vec<Operation>>,
    /// composite
    pub alpha: Option<f64>,
    pub offset_x: Option<i64>,
    pub offset_y: Option<i64>,
    /// composite, the image placed on top
    #[serde(skip)]
    pub top: Option<PixelBuffer>,
}

/// An operation plus its arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationRequest {
    pub operation: Operation,
    #[serde(default)]
    pub params: Params,
}

impl OperationRequest {
    pub fn new(operation: Operation, params: Params) -> Self {
        Self { operation, params }
    }
}
