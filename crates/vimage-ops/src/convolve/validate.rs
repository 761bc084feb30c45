//! Parameter checks run before any buffer is touched.

use vimage_core::{Flags, ImageBuffer, ImageBufferMut, Pixel8888};

use super::edge::EdgePolicy;
use crate::{OpsError, OpsResult};

/// Largest value any size-like parameter may take.
pub(crate) const MAX_PARAMETER: u64 = (1 << 31) - 1;

/// Largest kernel extent whose window sum cannot overflow a `u32` lane.
pub(crate) const MAX_KERNEL: u32 = u32::MAX / 255;

/// Shape of one filter call, independent of the pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Request {
    pub src_width: usize,
    pub src_height: usize,
    pub src_row_bytes: usize,
    pub dest_width: usize,
    pub dest_height: usize,
    pub dest_row_bytes: usize,
    pub offset_x: usize,
    pub offset_y: usize,
    pub kernel_width: u32,
    pub kernel_height: u32,
}

impl Request {
    pub fn new(
        src: &ImageBuffer<'_>,
        dest: &ImageBufferMut<'_>,
        offset_x: usize,
        offset_y: usize,
        kernel_width: u32,
        kernel_height: u32,
    ) -> Self {
        Self {
            src_width: src.width(),
            src_height: src.height(),
            src_row_bytes: src.row_bytes(),
            dest_width: dest.width(),
            dest_height: dest.height(),
            dest_row_bytes: dest.row_bytes(),
            offset_x,
            offset_y,
            kernel_width,
            kernel_height,
        }
    }
}

/// Checks that both descriptors carry data.
pub(crate) fn check_buffers(src: &ImageBuffer<'_>, dest: &ImageBufferMut<'_>) -> OpsResult<()> {
    if src.is_null() {
        return Err(OpsError::NullPointerArgument("source buffer has no data"));
    }
    if dest.is_null() {
        return Err(OpsError::NullPointerArgument("destination buffer has no data"));
    }
    Ok(())
}

/// Validates a request and resolves the edge policy it selects.
///
/// Checks run in a fixed order and the first failure wins:
/// kernel parity, offsets, ROI extent, edge style, unknown flag bits,
/// parameter magnitude, then the background color.
pub(crate) fn validate(
    req: &Request,
    flags: Flags,
    background: Option<Pixel8888>,
) -> OpsResult<EdgePolicy> {
    if req.kernel_width % 2 == 0 || req.kernel_height % 2 == 0 {
        return Err(OpsError::InvalidKernelSize {
            width: req.kernel_width,
            height: req.kernel_height,
        });
    }

    if req.offset_x > req.src_width {
        return Err(OpsError::InvalidOffsetX {
            offset: req.offset_x,
            width: req.src_width,
        });
    }
    if req.offset_y > req.src_height {
        return Err(OpsError::InvalidOffsetY {
            offset: req.offset_y,
            height: req.src_height,
        });
    }

    let fits_x = req
        .offset_x
        .checked_add(req.dest_width)
        .is_some_and(|far| far <= req.src_width);
    let fits_y = req
        .offset_y
        .checked_add(req.dest_height)
        .is_some_and(|far| far <= req.src_height);
    if !fits_x || !fits_y {
        return Err(OpsError::RoiLargerThanInputBuffer(format!(
            "{}x{} at ({}, {}) in {}x{}",
            req.dest_width,
            req.dest_height,
            req.offset_x,
            req.offset_y,
            req.src_width,
            req.src_height
        )));
    }

    let style = flags & Flags::EDGE_STYLES;
    if style.edge_styles().count() != 1 {
        return Err(OpsError::InvalidEdgeStyle(style));
    }

    let unknown = flags.unknown_bits();
    if unknown != 0 {
        return Err(OpsError::UnknownFlagsBit(unknown));
    }

    let sizes = [
        ("source width", req.src_width as u64),
        ("source height", req.src_height as u64),
        ("source row bytes", req.src_row_bytes as u64),
        ("destination width", req.dest_width as u64),
        ("destination height", req.dest_height as u64),
        ("destination row bytes", req.dest_row_bytes as u64),
        ("offset_x", req.offset_x as u64),
        ("offset_y", req.offset_y as u64),
        ("kernel width", req.kernel_width as u64),
        ("kernel height", req.kernel_height as u64),
    ];
    if let Some((name, value)) = sizes.iter().find(|(_, v)| *v > MAX_PARAMETER) {
        return Err(OpsError::InvalidParameter(format!(
            "{name} {value} exceeds {MAX_PARAMETER}"
        )));
    }
    let kernel = req.kernel_width.max(req.kernel_height);
    if kernel > MAX_KERNEL {
        return Err(OpsError::InvalidParameter(format!(
            "kernel extent {kernel} exceeds {MAX_KERNEL}"
        )));
    }

    EdgePolicy::from_style(style, background).ok_or(OpsError::NullPointerArgument(
        "background color required for BACKGROUND_COLOR_FILL",
    ))
}
