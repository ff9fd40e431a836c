//! Operation dispatcher.
//!
//! Every operation is routed through one table entry holding its transform
//! and the parameter set used when the caller supplies none. Operations
//! without a default set (`chain`, `crop`, `composite`) must be given explicit
//! parameters.

use tracing::debug;

use super::{Operation, OperationRequest, Params};
use crate::error::{FilterError, Result};
use crate::filters::blur::{box_blur, DEFAULT_PASSES, DEFAULT_RADIUS};
use crate::filters::color_adjust::{invert, sepia};
use crate::filters::composite::{composite, DEFAULT_ALPHA};
use crate::filters::convolve::convolve;
use crate::filters::core::Kernel;
use crate::filters::edge::{edge, DEFAULT_EDGE_CUTOFF};
use crate::filters::geometry::{crop, mirror, rotate, DEFAULT_TURNS};
use crate::filters::grayscale::grayscale;
use crate::filters::sharpen::{sharpen, DEFAULT_AMOUNT};
use crate::filters::stylize::{threshold, DEFAULT_THRESHOLD_CUTOFF};
use crate::image::PixelBuffer;

/// Side length of the kernel requested for `convolve` when none is given.
pub const DEFAULT_KERNEL_SIZE: usize = 3;

/// Supplies kernels for `convolve` requests that do not carry one, such as
/// an interactive prompt or a kernel file reader.
pub trait KernelSource {
    /// Produce a `size` x `size` kernel.
    fn kernel(&mut self, size: usize) -> Result<Kernel>;
}

impl<F> KernelSource for F
where
    F: FnMut(usize) -> Result<Kernel>,
{
    fn kernel(&mut self, size: usize) -> Result<Kernel> {
        self(size)
    }
}

type Transform = fn(&mut Dispatcher<'_>, &PixelBuffer, &Params) -> Result<PixelBuffer>;

struct Route {
    transform: Transform,
    /// Parameters for a bare invocation; `None` means explicit ones are required.
    defaults: Option<Params>,
}

fn route(op: Operation) -> Route {
    let (transform, defaults): (Transform, Option<Params>) = match op {
        Operation::BoxBlur => (
            run_box_blur,
            Some(Params {
                radius: Some(DEFAULT_RADIUS),
                passes: Some(DEFAULT_PASSES),
                ..Default::default()
            }),
        ),
        Operation::Chain => (run_chain, None),
        Operation::Composite => (run_composite, None),
        Operation::Crop => (run_crop, None),
        Operation::Edge => (
            run_edge,
            Some(Params {
                cutoff: Some(DEFAULT_EDGE_CUTOFF),
                ..Default::default()
            }),
        ),
        Operation::Grayscale => (run_grayscale, Some(Params::default())),
        Operation::Invert => (run_invert, Some(Params::default())),
        Operation::Convolve => (
            run_convolve,
            Some(Params {
                kernel_size: Some(DEFAULT_KERNEL_SIZE),
                passes: Some(1),
                ..Default::default()
            }),
        ),
        Operation::MirrorH => (run_mirror_h, Some(Params::default())),
        Operation::MirrorV => (run_mirror_v, Some(Params::default())),
        Operation::RotateCW => (
            run_rotate_cw,
            Some(Params {
                turns: Some(DEFAULT_TURNS),
                ..Default::default()
            }),
        ),
        Operation::RotateCCW => (
            run_rotate_ccw,
            Some(Params {
                turns: Some(DEFAULT_TURNS),
                ..Default::default()
            }),
        ),
        Operation::Sepia => (run_sepia, Some(Params::default())),
        Operation::Sharpen => (
            run_sharpen,
            Some(Params {
                amount: Some(DEFAULT_AMOUNT),
                ..Default::default()
            }),
        ),
        Operation::Threshold => (
            run_threshold,
            Some(Params {
                cutoff: Some(DEFAULT_THRESHOLD_CUTOFF),
                binary: Some(false),
                invert: Some(false),
                ..Default::default()
            }),
        ),
    };
    Route { transform, defaults }
}

/// Resolves operations to filter calls.
///
/// Holds the optional [`KernelSource`] used by `convolve`; otherwise
/// stateless.
#[derive(Default)]
pub struct Dispatcher<'a> {
    kernels: Option<Box<dyn KernelSource + 'a>>,
}

impl<'a> Dispatcher<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a source for kernels that `convolve` requests omit.
    pub fn with_kernel_source(mut self, source: impl KernelSource + 'a) -> Self {
        self.kernels = Some(Box::new(source));
        self
    }

    /// Apply an operation by identifier.
    ///
    /// With `params` of `None` the operation runs with its defaults.
    pub fn apply(&mut self, image: &PixelBuffer, name: &str, params: Option<&Params>) -> Result<PixelBuffer> {
        let op: Operation = name.parse()?;
        match params {
            Some(params) => self.apply_with_params(image, op, params),
            None => self.apply_with_defaults(image, op),
        }
    }

    /// Apply an operation with explicit parameters.
    ///
    /// Fields left as `None` fall back to the operation's defaults.
    pub fn apply_with_params(&mut self, image: &PixelBuffer, op: Operation, params: &Params) -> Result<PixelBuffer> {
        debug!(operation = %op, "performing operation");
        (route(op).transform)(self, image, params)
    }

    /// Apply an operation with its default parameters.
    ///
    /// Fails with `MissingParameters` for operations that have none.
    pub fn apply_with_defaults(&mut self, image: &PixelBuffer, op: Operation) -> Result<PixelBuffer> {
        let route = route(op);
        let defaults = route.defaults.ok_or(FilterError::MissingParameters(op))?;
        debug!(operation = %op, "performing operation with defaults");
        (route.transform)(self, image, &defaults)
    }

    /// Run a deserialized request.
    pub fn execute(&mut self, image: &PixelBuffer, request: &OperationRequest) -> Result<PixelBuffer> {
        self.apply_with_params(image, request.operation, &request.params)
    }

    fn request_kernel(&mut self, size: usize) -> Result<Kernel> {
        let source = self
            .kernels
            .as_mut()
            .ok_or(FilterError::MissingParameters(Operation::Convolve))?;
        let kernel = source.kernel(size)?;
        if kernel.size() != size {
            return Err(FilterError::InvalidKernel(format!(
                "expected a {0}x{0} kernel, got {1}x{1}",
                size,
                kernel.size()
            )));
        }
        Ok(kernel)
    }
}

/// Apply an operation by identifier without a kernel source.
pub fn apply(image: &PixelBuffer, name: &str, params: Option<&Params>) -> Result<PixelBuffer> {
    Dispatcher::new().apply(image, name, params)
}

// ============================================================================
// Transforms
// ============================================================================

fn run_box_blur(_: &mut Dispatcher<'_>, image: &PixelBuffer, p: &Params) -> Result<PixelBuffer> {
    box_blur(
        image,
        p.radius.unwrap_or(DEFAULT_RADIUS),
        p.passes.unwrap_or(DEFAULT_PASSES),
    )
}

fn run_chain(d: &mut Dispatcher<'_>, image: &PixelBuffer, p: &Params) -> Result<PixelBuffer> {
    let operations = p
        .operations
        .as_deref()
        .ok_or(FilterError::MissingParameters(Operation::Chain))?;
    d.chain(image, operations)
}

fn run_composite(_: &mut Dispatcher<'_>, image: &PixelBuffer, p: &Params) -> Result<PixelBuffer> {
    let top = p
        .top
        .as_ref()
        .ok_or(FilterError::MissingParameters(Operation::Composite))?;
    composite(
        image,
        top,
        p.alpha.unwrap_or(DEFAULT_ALPHA),
        p.offset_x.unwrap_or(0),
        p.offset_y.unwrap_or(0),
    )
}

fn run_crop(_: &mut Dispatcher<'_>, image: &PixelBuffer, p: &Params) -> Result<PixelBuffer> {
    match (p.x1, p.y1, p.x2, p.y2) {
        (Some(x1), Some(y1), Some(x2), Some(y2)) => crop(image, x1, y1, x2, y2),
        _ => Err(FilterError::MissingParameters(Operation::Crop)),
    }
}

fn run_edge(_: &mut Dispatcher<'_>, image: &PixelBuffer, p: &Params) -> Result<PixelBuffer> {
    edge(image, p.cutoff.unwrap_or(DEFAULT_EDGE_CUTOFF))
}

fn run_grayscale(_: &mut Dispatcher<'_>, image: &PixelBuffer, _: &Params) -> Result<PixelBuffer> {
    Ok(grayscale(image))
}

fn run_invert(_: &mut Dispatcher<'_>, image: &PixelBuffer, _: &Params) -> Result<PixelBuffer> {
    Ok(invert(image))
}

fn run_convolve(d: &mut Dispatcher<'_>, image: &PixelBuffer, p: &Params) -> Result<PixelBuffer> {
    let requested;
    let kernel = match &p.kernel {
        Some(kernel) => kernel,
        None => {
            requested = d.request_kernel(p.kernel_size.unwrap_or(DEFAULT_KERNEL_SIZE))?;
            &requested
        }
    };
    convolve(image, kernel, p.passes.unwrap_or(1))
}

fn run_mirror_h(_: &mut Dispatcher<'_>, image: &PixelBuffer, _: &Params) -> Result<PixelBuffer> {
    Ok(mirror(image, false))
}

fn run_mirror_v(_: &mut Dispatcher<'_>, image: &PixelBuffer, _: &Params) -> Result<PixelBuffer> {
    Ok(mirror(image, true))
}

fn checked_turns(p: &Params) -> Result<i32> {
    let turns = p.turns.unwrap_or(DEFAULT_TURNS);
    if turns < 1 {
        return Err(FilterError::parameter(
            "turns",
            format!("must be a positive integer, got {}", turns),
        ));
    }
    Ok(turns)
}

fn run_rotate_cw(_: &mut Dispatcher<'_>, image: &PixelBuffer, p: &Params) -> Result<PixelBuffer> {
    Ok(rotate(image, checked_turns(p)?, false))
}

fn run_rotate_ccw(_: &mut Dispatcher<'_>, image: &PixelBuffer, p: &Params) -> Result<PixelBuffer> {
    Ok(rotate(image, checked_turns(p)?, true))
}

fn run_sepia(_: &mut Dispatcher<'_>, image: &PixelBuffer, _: &Params) -> Result<PixelBuffer> {
    Ok(sepia(image))
}

fn run_sharpen(_: &mut Dispatcher<'_>, image: &PixelBuffer, p: &Params) -> Result<PixelBuffer> {
    sharpen(image, p.amount.unwrap_or(DEFAULT_AMOUNT))
}

fn run_threshold(_: &mut Dispatcher<'_>, image: &PixelBuffer, p: &Params) -> Result<PixelBuffer> {
    threshold(
        image,
        p.cutoff.unwrap_or(DEFAULT_THRESHOLD_CUTOFF),
        p.binary.unwrap_or(false),
        p.invert.unwrap_or(false),
    )
}
