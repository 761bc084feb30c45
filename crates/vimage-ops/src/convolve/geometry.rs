//! ROI geometry.
//!
//! The interior rectangle `[start_i, end_i] x [start_j, end_j]` holds the ROI
//! positions whose whole kernel window lies inside the source. `top` and
//! `below` count the source rows just outside the ROI that the vertical pass
//! reads, which the horizontal pass must therefore also produce.
//!
//! Kernels wider than the source make the interior empty
//! (`start > end`). That is a valid shape, not an error.

use std::ops::Range;

use super::validate::Request;

/// Derived interior bounds and margin row counts for one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoiGeometry {
    /// Half kernel width.
    pub kw2: usize,
    /// Half kernel height.
    pub kh2: usize,
    /// First interior row.
    pub start_i: i64,
    /// Last interior row.
    pub end_i: i64,
    /// First interior column.
    pub start_j: i64,
    /// Last interior column.
    pub end_j: i64,
    /// Margin rows above the ROI.
    pub top: usize,
    /// Margin rows below the ROI.
    pub below: usize,
}

impl RoiGeometry {
    /// Computes the geometry of a validated request.
    pub(crate) fn new(req: &Request) -> Self {
        let kw2 = (req.kernel_width / 2) as usize;
        let kh2 = (req.kernel_height / 2) as usize;

        let (start_j, end_j) = interior(
            kw2 as i64,
            req.offset_x as i64,
            req.dest_width as i64,
            req.src_width as i64,
        );
        let (start_i, end_i) = interior(
            kh2 as i64,
            req.offset_y as i64,
            req.dest_height as i64,
            req.src_height as i64,
        );

        let top = (kh2 as i64 - start_i) as usize;
        let below = (end_i + 1 + kh2 as i64 - req.dest_height as i64) as usize;

        Self {
            kw2,
            kh2,
            start_i,
            end_i,
            start_j,
            end_j,
            top,
            below,
        }
    }

    /// Interior columns clamped to `0..width`, possibly empty.
    pub fn interior_cols(&self, width: usize) -> Range<usize> {
        clamp_range(self.start_j, self.end_j, width)
    }

    /// Interior rows clamped to `0..height`, possibly empty.
    pub fn interior_rows(&self, height: usize) -> Range<usize> {
        clamp_range(self.start_i, self.end_i, height)
    }

    /// Logical rows seen by the vertical pass: margins plus destination.
    #[inline]
    pub fn logical_rows(&self, height: usize) -> usize {
        self.top + height + self.below
    }
}

fn interior(half: i64, offset: i64, extent: i64, src_extent: i64) -> (i64, i64) {
    let start = (half - offset).max(0);
    let end = extent - 1 - (offset + extent + half - src_extent).max(0);
    (start, end)
}

fn clamp_range(start: i64, end: i64, len: usize) -> Range<usize> {
    let len = len as i64;
    let lo = start.clamp(0, len);
    let hi = (end + 1).clamp(lo, len);
    lo as usize..hi as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(src: (usize, usize), dest: (usize, usize), off: (usize, usize), k: (u32, u32)) -> Request {
        Request {
            src_width: src.0,
            src_height: src.1,
            src_row_bytes: src.0 * 4,
            dest_width: dest.0,
            dest_height: dest.1,
            dest_row_bytes: dest.0 * 4,
            offset_x: off.0,
            offset_y: off.1,
            kernel_width: k.0,
            kernel_height: k.1,
        }
    }

    #[test]
    fn test_full_image() {
        let g = RoiGeometry::new(&request((10, 10), (10, 10), (0, 0), (5, 5)));
        assert_eq!((g.start_j, g.end_j), (2, 7));
        assert_eq!((g.start_i, g.end_i), (2, 7));
        assert_eq!((g.top, g.below), (0, 0));
        assert_eq!(g.interior_cols(10), 2..8);
    }

    #[test]
    fn test_roi_with_margins() {
        // 4x4 ROI at (3, 1) in a 10x8 source, 3x5 kernel
        let g = RoiGeometry::new(&request((10, 8), (4, 4), (3, 1), (3, 5)));
        assert_eq!((g.start_j, g.end_j), (0, 3));
        assert_eq!(g.start_i, 1);
        assert_eq!(g.end_i, 3);
        assert_eq!(g.top, 1);
        assert_eq!(g.below, 2);
        assert_eq!(g.logical_rows(4), 7);
    }

    #[test]
    fn test_margins_never_exceed_half_kernel() {
        for off_y in 0..=6 {
            let g = RoiGeometry::new(&request((4, 10), (4, 4), (0, off_y), (1, 7)));
            assert_eq!(g.top, off_y.min(3));
            assert_eq!(g.below, (10 - off_y - 4).min(3));
        }
    }

    #[test]
    fn test_kernel_larger_than_source() {
        let g = RoiGeometry::new(&request((3, 3), (3, 3), (0, 0), (9, 9)));
        assert!(g.start_j > g.end_j);
        assert!(g.interior_cols(3).is_empty());
        assert!(g.interior_rows(3).is_empty());
        assert_eq!((g.top, g.below), (0, 0));
    }

    #[test]
    fn test_identity_kernel() {
        let g = RoiGeometry::new(&request((6, 5), (2, 3), (1, 1), (1, 1)));
        assert_eq!(g.interior_cols(2), 0..2);
        assert_eq!(g.interior_rows(3), 0..3);
        assert_eq!((g.top, g.below), (0, 0));
    }
}
