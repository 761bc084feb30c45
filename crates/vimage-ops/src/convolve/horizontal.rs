//! Horizontal pass.
//!
//! Filters the source rows the vertical pass will read: `top` rows above the
//! ROI, the ROI rows themselves, then `below` rows under it. ROI rows land in
//! the destination, the others in the scratch margin rows.

use std::ops::Range;

use tracing::trace;
use vimage_core::{ImageBuffer, ImageBufferMut, Pixel8888};

use super::edge::EdgePolicy;
use super::geometry::RoiGeometry;
use super::line::convolve_line;

pub(crate) fn run(
    src: &ImageBuffer<'_>,
    dest: &mut ImageBufferMut<'_>,
    margins: &mut [Pixel8888],
    geometry: &RoiGeometry,
    policy: &EdgePolicy,
    offset_x: usize,
    offset_y: usize,
) {
    let width = dest.width();
    let height = dest.height();
    let top = geometry.top;
    let cols = if policy.is_copy_through() {
        geometry.interior_cols(width)
    } else {
        0..width
    };
    let first_row = offset_y - top;

    trace!(rows = geometry.logical_rows(height), ?cols, "horizontal pass");

    for r in 0..geometry.logical_rows(height) {
        let src_row = src.row(first_row + r);
        let out = if r < top {
            &mut margins[r * width..(r + 1) * width]
        } else if r < top + height {
            dest.row_mut(r - top)
        } else {
            let m = r - height;
            &mut margins[m * width..(m + 1) * width]
        };
        convolve_row(policy, src_row, offset_x, geometry.kw2, cols.clone(), out);
    }
}

/// Filters `out.len()` pixels of `src_row` starting at `offset_x`.
///
/// Only `cols` are convolved; the rest are copied.
fn convolve_row(
    policy: &EdgePolicy,
    src_row: &[Pixel8888],
    offset_x: usize,
    radius: usize,
    cols: Range<usize>,
    out: &mut [Pixel8888],
) {
    let roi = &src_row[offset_x..offset_x + out.len()];
    out[..cols.start].copy_from_slice(&roi[..cols.start]);
    out[cols.end..].copy_from_slice(&roi[cols.end..]);
    convolve_line(
        policy,
        src_row.len(),
        offset_x + cols.start,
        radius,
        |x| src_row[x],
        &mut out[cols],
    );
}
