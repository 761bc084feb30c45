//! Box convolution of 8-bit 4-channel images.
//!
//! A separable box filter: every destination pixel is the mean of a
//! `kernel_width x kernel_height` window of the source, centred on the
//! matching source pixel of the region of interest (ROI). The ROI is the
//! destination-sized rectangle of the source at `(offset_x, offset_y)`.
//!
//! # Passes
//!
//! 1. Horizontal: row sums into the destination and scratch margin rows
//! 2. Vertical: column sums over that intermediate, staged then written back
//!
//! Both passes keep an O(1) sliding window per output pixel.
//!
//! # Edge Handling
//!
//! Exactly one [`EdgePolicy`] applies per call:
//!
//! | Policy | Samples outside the source | Divisor |
//! |---|---|---|
//! | `CopyThrough` | pixel keeps its source value | n/a |
//! | `TruncateKernel` | skipped | samples inside |
//! | `BackgroundFill` | the given color | full kernel |
//! | `EdgeExtend` | nearest edge sample | full kernel |
//!
//! # Example
//!
//! ```rust
//! use vimage_core::{Flags, PixelBuffer};
//! use vimage_ops::{box_convolve_argb8888, BoxConvolve, Convolved, EdgePolicy};
//!
//! let src = PixelBuffer::filled(16, 16, [255, 40, 80, 120]).unwrap();
//! let mut dst = PixelBuffer::new(16, 16).unwrap();
//!
//! // Flag style
//! let done = box_convolve_argb8888(
//!     &src.view(), &mut dst.view_mut(), None,
//!     0, 0, 5, 5, None, Flags::EDGE_EXTEND,
//! ).unwrap();
//! assert_eq!(done, Convolved::Done);
//! assert_eq!(dst.pixel(0, 0), [255, 40, 80, 120]);
//!
//! // Builder style
//! BoxConvolve::square(3)
//!     .edge(EdgePolicy::TruncateKernel)
//!     .apply(&src.view(), &mut dst.view_mut(), None)
//!     .unwrap();
//! ```

mod edge;
mod geometry;
mod horizontal;
mod line;
mod scratch;
mod validate;
mod vertical;

pub use edge::EdgePolicy;
pub use geometry::RoiGeometry;

use tracing::{debug, trace, warn};
use vimage_core::{Flags, ImageBuffer, ImageBufferMut, Pixel8888, BYTES_PER_PIXEL};

use crate::{codes, OpsError, OpsResult};
use scratch::{Scratch, ScratchLayout};
use validate::Request;

/// Successful outcome of [`box_convolve_argb8888`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convolved {
    /// The destination holds the filtered ROI.
    Done,
    /// `GET_TEMP_BUFFER_SIZE` was set: scratch bytes needed, nothing written.
    TempBufferSize(usize),
}

impl Convolved {
    /// Numeric status: `0` when done, else the byte count.
    pub fn status(&self) -> isize {
        match self {
            Self::Done => codes::NO_ERROR,
            Self::TempBufferSize(bytes) => *bytes as isize,
        }
    }
}

/// Collapses a filter result into the numeric status channel.
///
/// ```rust
/// use vimage_ops::{status_code, Convolved, OpsError};
///
/// assert_eq!(status_code(&Ok(Convolved::TempBufferSize(64))), 64);
/// assert_eq!(status_code(&Err(OpsError::UnknownFlagsBit(0x400))), -21775);
/// ```
pub fn status_code(result: &OpsResult<Convolved>) -> isize {
    match result {
        Ok(done) => done.status(),
        Err(e) => e.code(),
    }
}

/// Everything derived from a validated request.
struct Plan {
    policy: EdgePolicy,
    geometry: RoiGeometry,
    layout: ScratchLayout,
    bytes: usize,
}

impl Plan {
    fn new(req: &Request, flags: Flags, background: Option<Pixel8888>) -> OpsResult<Self> {
        let policy = validate::validate(req, flags, background)?;
        let geometry = RoiGeometry::new(req);
        let layout = ScratchLayout::new(&geometry, req.dest_width, req.dest_height);
        let bytes = layout.bytes()?;
        debug!(
            ?policy,
            start_i = geometry.start_i,
            end_i = geometry.end_i,
            start_j = geometry.start_j,
            end_j = geometry.end_j,
            top = geometry.top,
            below = geometry.below,
            scratch_bytes = bytes,
            "box convolve plan"
        );
        Ok(Self {
            policy,
            geometry,
            layout,
            bytes,
        })
    }
}

/// Box-filters the ROI of `src` at `(offset_x, offset_y)` into `dest`.
///
/// The ROI has the size of `dest`. `flags` must hold exactly one edge style;
/// `background` is required with `BACKGROUND_COLOR_FILL` and ignored
/// otherwise. `temp` is optional scratch memory; ask for its size with
/// `GET_TEMP_BUFFER_SIZE`, which returns [`Convolved::TempBufferSize`] and
/// touches nothing.
///
/// Without `temp` the filter allocates scratch itself and frees it before
/// returning, unless `NO_ALLOCATE` is set. With `PRINT_DIAGNOSTICS_TO_CONSOLE`,
/// failures are also logged at `warn` level.
///
/// # Errors
///
/// Validation runs before any write, so on error `dest` is unchanged. See
/// [`OpsError`] for the conditions.
#[allow(clippy::too_many_arguments)]
pub fn box_convolve_argb8888(
    src: &ImageBuffer<'_>,
    dest: &mut ImageBufferMut<'_>,
    temp: Option<&mut [u8]>,
    offset_x: usize,
    offset_y: usize,
    kernel_height: u32,
    kernel_width: u32,
    background: Option<Pixel8888>,
    flags: Flags,
) -> OpsResult<Convolved> {
    trace!(
        src_width = src.width(),
        src_height = src.height(),
        dest_width = dest.width(),
        dest_height = dest.height(),
        offset_x,
        offset_y,
        kernel_width,
        kernel_height,
        ?flags,
        "box_convolve_argb8888"
    );

    let result = convolve(
        src,
        dest,
        temp,
        (offset_x, offset_y),
        (kernel_width, kernel_height),
        background,
        flags,
    );

    if flags.contains(Flags::PRINT_DIAGNOSTICS_TO_CONSOLE) {
        if let Err(e) = &result {
            warn!(code = e.code(), "box_convolve_argb8888 failed: {e}");
        }
    }
    result
}

fn convolve(
    src: &ImageBuffer<'_>,
    dest: &mut ImageBufferMut<'_>,
    temp: Option<&mut [u8]>,
    (offset_x, offset_y): (usize, usize),
    (kernel_width, kernel_height): (u32, u32),
    background: Option<Pixel8888>,
    flags: Flags,
) -> OpsResult<Convolved> {
    validate::check_buffers(src, dest)?;
    let req = Request::new(src, dest, offset_x, offset_y, kernel_width, kernel_height);
    let plan = Plan::new(&req, flags, background)?;

    if flags.contains(Flags::GET_TEMP_BUFFER_SIZE) {
        return Ok(Convolved::TempBufferSize(plan.bytes));
    }
    if dest.width() == 0 || dest.height() == 0 {
        return Ok(Convolved::Done);
    }

    let mut scratch = Scratch::acquire(&plan.layout, temp, flags.contains(Flags::NO_ALLOCATE))?;
    let (margins, staging) = scratch.split(&plan.layout);

    horizontal::run(
        src,
        dest,
        margins,
        &plan.geometry,
        &plan.policy,
        offset_x,
        offset_y,
    );
    vertical::run(
        src,
        dest,
        margins,
        staging,
        &plan.geometry,
        &plan.policy,
        offset_x,
        offset_y,
    );

    Ok(Convolved::Done)
}

/// Typed front end to [`box_convolve_argb8888`].
///
/// Defaults to [`EdgePolicy::EdgeExtend`] and a ROI at the source origin.
///
/// ```rust
/// use vimage_core::PixelBuffer;
/// use vimage_ops::{BoxConvolve, EdgePolicy};
///
/// let src = PixelBuffer::filled(8, 8, [10, 20, 30, 40]).unwrap();
/// let mut dst = PixelBuffer::new(4, 4).unwrap();
/// let blur = BoxConvolve::new(5, 3)
///     .offset(2, 2)
///     .edge(EdgePolicy::BackgroundFill([0, 0, 0, 0]));
///
/// let size = blur.temp_buffer_size(&src.view(), 4, 4).unwrap();
/// let mut temp = vec![0u8; size];
/// blur.no_allocate()
///     .apply(&src.view(), &mut dst.view_mut(), Some(temp.as_mut_slice()))
///     .unwrap();
/// assert_eq!(dst.pixel(3, 3), [10, 20, 30, 40]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxConvolve {
    kernel_width: u32,
    kernel_height: u32,
    offset_x: usize,
    offset_y: usize,
    edge: EdgePolicy,
    modifiers: Flags,
}

impl BoxConvolve {
    /// Creates a filter with the given kernel extent.
    pub fn new(kernel_width: u32, kernel_height: u32) -> Self {
        Self {
            kernel_width,
            kernel_height,
            offset_x: 0,
            offset_y: 0,
            edge: EdgePolicy::EdgeExtend,
            modifiers: Flags::NO_FLAGS,
        }
    }

    /// Creates a filter with a `size x size` kernel.
    pub fn square(size: u32) -> Self {
        Self::new(size, size)
    }

    /// Sets the ROI offset in the source.
    pub fn offset(mut self, x: usize, y: usize) -> Self {
        self.offset_x = x;
        self.offset_y = y;
        self
    }

    /// Sets the edge policy.
    pub fn edge(mut self, edge: EdgePolicy) -> Self {
        self.edge = edge;
        self
    }

    /// Forbids internal scratch allocation.
    pub fn no_allocate(mut self) -> Self {
        self.modifiers |= Flags::NO_ALLOCATE;
        self
    }

    /// Logs failures at `warn` level.
    pub fn diagnostics(mut self) -> Self {
        self.modifiers |= Flags::PRINT_DIAGNOSTICS_TO_CONSOLE;
        self
    }

    /// Flags equivalent to this configuration.
    pub fn flags(&self) -> Flags {
        self.edge.flag() | self.modifiers
    }

    /// Scratch bytes needed to filter a `dest_width x dest_height` ROI of `src`.
    pub fn temp_buffer_size(
        &self,
        src: &ImageBuffer<'_>,
        dest_width: usize,
        dest_height: usize,
    ) -> OpsResult<usize> {
        if src.is_null() {
            return Err(OpsError::NullPointerArgument("source buffer has no data"));
        }
        self.size_for(
            (src.width(), src.height(), src.row_bytes()),
            dest_width,
            dest_height,
        )
    }

    /// Scratch bytes for a tightly packed source of the given size.
    ///
    /// Same as [`BoxConvolve::temp_buffer_size`] without needing pixel data.
    pub fn temp_buffer_size_for(
        &self,
        src_width: usize,
        src_height: usize,
        dest_width: usize,
        dest_height: usize,
    ) -> OpsResult<usize> {
        let src_row_bytes = src_width.saturating_mul(BYTES_PER_PIXEL);
        self.size_for((src_width, src_height, src_row_bytes), dest_width, dest_height)
    }

    fn size_for(
        &self,
        (src_width, src_height, src_row_bytes): (usize, usize, usize),
        dest_width: usize,
        dest_height: usize,
    ) -> OpsResult<usize> {
        let req = Request {
            src_width,
            src_height,
            src_row_bytes,
            dest_width,
            dest_height,
            dest_row_bytes: dest_width.saturating_mul(BYTES_PER_PIXEL),
            offset_x: self.offset_x,
            offset_y: self.offset_y,
            kernel_width: self.kernel_width,
            kernel_height: self.kernel_height,
        };
        Ok(Plan::new(&req, self.flags(), self.edge.background())?.bytes)
    }

    /// Filters the ROI of `src` into `dest`.
    pub fn apply(
        &self,
        src: &ImageBuffer<'_>,
        dest: &mut ImageBufferMut<'_>,
        temp: Option<&mut [u8]>,
    ) -> OpsResult<()> {
        box_convolve_argb8888(
            src,
            dest,
            temp,
            self.offset_x,
            self.offset_y,
            self.kernel_height,
            self.kernel_width,
            self.edge.background(),
            self.flags(),
        )
        .map(|_| ())
    }
}
