//! Scratch memory for one filter call.
//!
//! Layout, in pixels:
//!
//! ```text
//! [ top margin rows | below margin rows | staging column ]
//!   top * width       below * width       max(width, height)
//! ```
//!
//! Margin rows hold the horizontal result for source rows just outside the
//! ROI. The staging column receives one finished column of the vertical pass
//! before it is written back into the destination.

use tracing::{debug, trace};
use vimage_core::{BYTES_PER_PIXEL, Pixel8888};

use super::geometry::RoiGeometry;
use crate::{OpsError, OpsResult};

/// Sizes of the scratch regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScratchLayout {
    pub width: usize,
    pub top: usize,
    pub below: usize,
    pub staging: usize,
}

impl ScratchLayout {
    pub fn new(geometry: &RoiGeometry, width: usize, height: usize) -> Self {
        Self {
            width,
            top: geometry.top,
            below: geometry.below,
            staging: width.max(height),
        }
    }

    /// Pixels in the margin rows.
    #[inline]
    pub fn margin_pixels(&self) -> usize {
        (self.top + self.below) * self.width
    }

    /// Total scratch size in pixels.
    pub fn pixels(&self) -> OpsResult<usize> {
        (self.top + self.below)
            .checked_mul(self.width)
            .and_then(|m| m.checked_add(self.staging))
            .ok_or_else(|| OpsError::InvalidParameter("scratch size overflows".into()))
    }

    /// Total scratch size in bytes.
    pub fn bytes(&self) -> OpsResult<usize> {
        self.pixels()?
            .checked_mul(BYTES_PER_PIXEL)
            .ok_or_else(|| OpsError::InvalidParameter("scratch size overflows".into()))
    }
}

/// Scratch pixels, either lent by the caller or owned by the filter.
///
/// Filter-owned memory is freed when the value drops, on every return path.
pub(crate) enum Scratch<'a> {
    Borrowed(&'a mut [Pixel8888]),
    Owned(Vec<Pixel8888>),
}

impl<'a> Scratch<'a> {
    /// Takes the caller buffer or allocates one.
    ///
    /// A caller buffer may be longer than needed; only the prefix is used.
    pub fn acquire(
        layout: &ScratchLayout,
        caller: Option<&'a mut [u8]>,
        no_allocate: bool,
    ) -> OpsResult<Self> {
        let pixels = layout.pixels()?;
        let required = layout.bytes()?;

        match caller {
            Some(buf) => {
                if buf.len() < required {
                    return Err(OpsError::BufferSizeMismatch {
                        len: buf.len(),
                        required,
                    });
                }
                trace!(required, len = buf.len(), "using caller scratch");
                let (head, _) = buf.split_at_mut(required);
                Ok(Self::Borrowed(bytemuck::cast_slice_mut(head)))
            }
            None if no_allocate => Err(OpsError::MemoryAllocationError(
                "NO_ALLOCATE set and no scratch buffer supplied".into(),
            )),
            None => {
                debug!(bytes = required, "allocating scratch");
                let mut owned = Vec::new();
                owned
                    .try_reserve_exact(pixels)
                    .map_err(|e| OpsError::MemoryAllocationError(e.to_string()))?;
                owned.resize(pixels, [0; 4]);
                Ok(Self::Owned(owned))
            }
        }
    }

    /// Returns `true` if the filter allocated this memory.
    #[inline]
    pub fn is_owned(&self) -> bool {
        matches!(self, Self::Owned(_))
    }

    fn pixels_mut(&mut self) -> &mut [Pixel8888] {
        match self {
            Self::Borrowed(px) => &mut px[..],
            Self::Owned(px) => px.as_mut_slice(),
        }
    }

    /// Splits into margin rows and the staging column.
    pub fn split(&mut self, layout: &ScratchLayout) -> (&mut [Pixel8888], &mut [Pixel8888]) {
        let (margins, rest) = self.pixels_mut().split_at_mut(layout.margin_pixels());
        (margins, &mut rest[..layout.staging])
    }
}

impl Drop for Scratch<'_> {
    fn drop(&mut self) {
        if self.is_owned() {
            trace!("releasing scratch");
        }
    }
}
