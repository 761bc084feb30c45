//! Vertical pass.
//!
//! Reads the horizontal result as one tall logical image
//!
//! ```text
//! logical row 0 .. top            -> top margin rows
//! logical row top .. top + height -> destination rows
//! logical row top + height ..     -> below margin rows
//! ```
//!
//! and filters it column by column. A finished column goes to the staging
//! line first and is written back only once every window over that column
//! has been summed, so no window reads a row it already overwrote.

use tracing::trace;
use vimage_core::{ImageBuffer, ImageBufferMut, Pixel8888};

use super::edge::EdgePolicy;
use super::geometry::RoiGeometry;
use super::line::convolve_line;

#[allow(clippy::too_many_arguments)]
pub(crate) fn run(
    src: &ImageBuffer<'_>,
    dest: &mut ImageBufferMut<'_>,
    margins: &[Pixel8888],
    staging: &mut [Pixel8888],
    geometry: &RoiGeometry,
    policy: &EdgePolicy,
    offset_x: usize,
    offset_y: usize,
) {
    let width = dest.width();
    let height = dest.height();
    let top = geometry.top;
    let len = geometry.logical_rows(height);
    let (cols, rows) = if policy.is_copy_through() {
        (geometry.interior_cols(width), geometry.interior_rows(height))
    } else {
        (0..width, 0..height)
    };
    let staging = &mut staging[..height];

    trace!(len, ?cols, ?rows, "vertical pass");

    for j in cols {
        {
            let view = dest.as_view();
            let fetch = |p: usize| {
                if p < top {
                    margins[p * width + j]
                } else if p < top + height {
                    view.pixel(j, p - top)
                } else {
                    margins[(p - height) * width + j]
                }
            };
            convolve_line(
                policy,
                len,
                top + rows.start,
                geometry.kh2,
                fetch,
                &mut staging[rows.clone()],
            );
        }

        // Rows outside a copy-through interior take the source pixel
        for i in (0..rows.start).chain(rows.end..height) {
            staging[i] = src.pixel(offset_x + j, offset_y + i);
        }

        for (i, &px) in staging.iter().enumerate() {
            dest.set_pixel(j, i, px);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_uses_margins() {
        // 1x2 ROI with one margin row on each side
        let geometry = RoiGeometry {
            kw2: 0,
            kh2: 1,
            start_i: 0,
            end_i: 1,
            start_j: 0,
            end_j: 0,
            top: 1,
            below: 1,
        };
        let src_bytes = [0u8; 16];
        let src = ImageBuffer::new(&src_bytes, 1, 4, 4).unwrap();
        let mut dest_bytes = [30, 30, 30, 30, 60, 60, 60, 60];
        let mut dest = ImageBufferMut::new(&mut dest_bytes, 1, 2, 4).unwrap();
        let margins = [[0u8; 4], [90u8; 4]];
        let mut staging = [[0u8; 4]; 2];

        run(
            &src,
            &mut dest,
            &margins,
            &mut staging,
            &geometry,
            &EdgePolicy::EdgeExtend,
            0,
            1,
        );
        assert_eq!(dest.pixel(0, 0), [30; 4]);
        assert_eq!(dest.pixel(0, 1), [60; 4]);
    }
}
