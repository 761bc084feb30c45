//! Buffer descriptors over 4-channel 8-bit pixel memory.
//!
//! - [`ImageBuffer`] - Immutable descriptor borrowing caller memory
//! - [`ImageBufferMut`] - Mutable descriptor borrowing caller memory
//! - [`PixelBuffer`] - Owned storage with padded rows
//!
//! A descriptor is `{ data, width, height, row_bytes }` and never owns the
//! bytes it describes. An empty `data` slice is a *null* descriptor: it can
//! be constructed, but every pixel accessor requires non-empty data, and the
//! filter rejects it before touching memory.
//!
//! # Usage
//!
//! ```rust
//! use vimage_core::{ImageBuffer, PixelBuffer};
//!
//! // Describe a tightly packed 2x2 image
//! let bytes = [0u8; 2 * 2 * 4];
//! let view = ImageBuffer::new(&bytes, 2, 2, 8).unwrap();
//! assert_eq!(view.pixel(1, 1), [0, 0, 0, 0]);
//!
//! // Or let an owned buffer pick an aligned stride
//! let mut owned = PixelBuffer::filled(3, 2, [1, 2, 3, 4]).unwrap();
//! assert_eq!(owned.row_bytes(), 64);
//! owned.view_mut().set_pixel(0, 0, [9, 9, 9, 9]);
//! assert_eq!(owned.pixel(0, 0), [9, 9, 9, 9]);
//! ```

use crate::pixel::{BYTES_PER_PIXEL, Pixel8888};
use crate::{Error, Result};

/// Row alignment of [`PixelBuffer`], in pixels.
pub const ROW_ALIGNMENT_PIXELS: usize = 16;

/// Validates a descriptor layout and returns the number of bytes it spans.
fn layout_len(width: usize, height: usize, row_bytes: usize) -> Result<usize> {
    let min_stride = width
        .checked_mul(BYTES_PER_PIXEL)
        .ok_or_else(|| Error::invalid_dimensions(width, height, "row size overflows"))?;
    if row_bytes < min_stride {
        return Err(Error::InvalidStride {
            stride: row_bytes,
            min_stride,
            width,
        });
    }
    if height == 0 || width == 0 {
        return Ok(0);
    }
    (height - 1)
        .checked_mul(row_bytes)
        .and_then(|n| n.checked_add(min_stride))
        .ok_or_else(|| Error::invalid_dimensions(width, height, "buffer size overflows"))
}

fn check_data(len: usize, width: usize, height: usize, row_bytes: usize) -> Result<()> {
    let required = layout_len(width, height, row_bytes)?;
    if len != 0 && len < required {
        return Err(Error::BufferTooSmall { len, required });
    }
    Ok(())
}

/// Immutable descriptor over caller-owned pixel rows.
#[derive(Clone, Copy)]
pub struct ImageBuffer<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    row_bytes: usize,
}

impl<'a> ImageBuffer<'a> {
    /// Describes `data` as a `width x height` image with `row_bytes` per row.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidStride`] if `row_bytes < width * 4`
    /// - [`Error::BufferTooSmall`] if a non-empty `data` does not cover every row
    pub fn new(data: &'a [u8], width: usize, height: usize, row_bytes: usize) -> Result<Self> {
        check_data(data.len(), width, height, row_bytes)?;
        Ok(Self {
            data,
            width,
            height,
            row_bytes,
        })
    }

    /// Describes a tightly packed image (`row_bytes == width * 4`).
    pub fn packed(data: &'a [u8], width: usize, height: usize) -> Result<Self> {
        Self::new(data, width, height, width.saturating_mul(BYTES_PER_PIXEL))
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes from the start of one row to the start of the next.
    #[inline]
    pub fn row_bytes(&self) -> usize {
        self.row_bytes
    }

    /// Returns `true` for a descriptor without data.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw bytes, including row padding.
    #[inline]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Row `y` as pixels, without padding.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height` or the descriptor is null.
    #[inline]
    pub fn row(&self, y: usize) -> &'a [Pixel8888] {
        debug_assert!(y < self.height, "row out of bounds");
        let start = y * self.row_bytes;
        bytemuck::cast_slice(&self.data[start..start + self.width * BYTES_PER_PIXEL])
    }

    /// Returns the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Pixel8888 {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        self.row(y)[x]
    }

    /// Returns the pixel at (x, y), or `None` if out of bounds or null.
    #[inline]
    pub fn get_pixel(&self, x: usize, y: usize) -> Option<Pixel8888> {
        if x < self.width && y < self.height && !self.is_null() {
            Some(self.pixel(x, y))
        } else {
            None
        }
    }
}

impl std::fmt::Debug for ImageBuffer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("row_bytes", &self.row_bytes)
            .field("len", &self.data.len())
            .finish()
    }
}

/// Mutable descriptor over caller-owned pixel rows.
pub struct ImageBufferMut<'a> {
    data: &'a mut [u8],
    width: usize,
    height: usize,
    row_bytes: usize,
}

impl<'a> ImageBufferMut<'a> {
    /// Describes `data` as a writable `width x height` image.
    ///
    /// Same layout rules as [`ImageBuffer::new`].
    pub fn new(data: &'a mut [u8], width: usize, height: usize, row_bytes: usize) -> Result<Self> {
        check_data(data.len(), width, height, row_bytes)?;
        Ok(Self {
            data,
            width,
            height,
            row_bytes,
        })
    }

    /// Describes a tightly packed writable image.
    pub fn packed(data: &'a mut [u8], width: usize, height: usize) -> Result<Self> {
        Self::new(data, width, height, width.saturating_mul(BYTES_PER_PIXEL))
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes from the start of one row to the start of the next.
    #[inline]
    pub fn row_bytes(&self) -> usize {
        self.row_bytes
    }

    /// Returns `true` for a descriptor without data.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.data.is_empty()
    }

    /// Reborrows as an immutable descriptor.
    #[inline]
    pub fn as_view(&self) -> ImageBuffer<'_> {
        ImageBuffer {
            data: &*self.data,
            width: self.width,
            height: self.height,
            row_bytes: self.row_bytes,
        }
    }

    /// Row `y` as pixels.
    #[inline]
    pub fn row(&self, y: usize) -> &[Pixel8888] {
        debug_assert!(y < self.height, "row out of bounds");
        let start = y * self.row_bytes;
        bytemuck::cast_slice(&self.data[start..start + self.width * BYTES_PER_PIXEL])
    }

    /// Row `y` as mutable pixels. Padding bytes stay out of reach.
    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [Pixel8888] {
        debug_assert!(y < self.height, "row out of bounds");
        let start = y * self.row_bytes;
        bytemuck::cast_slice_mut(&mut self.data[start..start + self.width * BYTES_PER_PIXEL])
    }

    /// Returns the pixel at (x, y).
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Pixel8888 {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        self.row(y)[x]
    }

    /// Sets the pixel at (x, y).
    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, px: Pixel8888) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        self.row_mut(y)[x] = px;
    }

    /// Fills every pixel, leaving padding untouched.
    pub fn fill(&mut self, px: Pixel8888) {
        for y in 0..self.height {
            self.row_mut(y).fill(px);
        }
    }
}

impl std::fmt::Debug for ImageBufferMut<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageBufferMut")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("row_bytes", &self.row_bytes)
            .field("len", &self.data.len())
            .finish()
    }
}

/// Owned pixel storage with rows padded to [`ROW_ALIGNMENT_PIXELS`].
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Vec<u8>,
    width: usize,
    height: usize,
    row_bytes: usize,
}

impl PixelBuffer {
    /// Allocates a zeroed `width x height` buffer.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDimensions`] on size overflow and
    /// [`Error::AllocationFailed`] when the allocator refuses.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let row_bytes = width
            .checked_next_multiple_of(ROW_ALIGNMENT_PIXELS)
            .and_then(|w| w.checked_mul(BYTES_PER_PIXEL))
            .ok_or_else(|| Error::invalid_dimensions(width, height, "row size overflows"))?;
        let len = row_bytes
            .checked_mul(height)
            .ok_or_else(|| Error::invalid_dimensions(width, height, "buffer size overflows"))?;

        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|e| Error::allocation_failed(len, e.to_string()))?;
        data.resize(len, 0);

        Ok(Self {
            data,
            width,
            height,
            row_bytes,
        })
    }

    /// Allocates a buffer with every pixel set to `px`.
    pub fn filled(width: usize, height: usize, px: Pixel8888) -> Result<Self> {
        let mut buf = Self::new(width, height)?;
        buf.view_mut().fill(px);
        Ok(buf)
    }

    /// Copies tightly packed pixel bytes into a new buffer.
    ///
    /// # Errors
    ///
    /// [`Error::BufferTooSmall`] if `packed` is not exactly `width * height * 4` bytes.
    pub fn from_packed(width: usize, height: usize, packed: &[u8]) -> Result<Self> {
        let row = width.saturating_mul(BYTES_PER_PIXEL);
        let required = row.saturating_mul(height);
        if packed.len() != required {
            return Err(Error::BufferTooSmall {
                len: packed.len(),
                required,
            });
        }
        let mut buf = Self::new(width, height)?;
        for (y, src) in packed.chunks_exact(row.max(1)).take(height).enumerate() {
            let start = y * buf.row_bytes;
            buf.data[start..start + row].copy_from_slice(src);
        }
        Ok(buf)
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes per row, including padding.
    #[inline]
    pub fn row_bytes(&self) -> usize {
        self.row_bytes
    }

    /// Immutable descriptor over the whole buffer.
    #[inline]
    pub fn view(&self) -> ImageBuffer<'_> {
        ImageBuffer {
            data: &self.data,
            width: self.width,
            height: self.height,
            row_bytes: self.row_bytes,
        }
    }

    /// Mutable descriptor over the whole buffer.
    #[inline]
    pub fn view_mut(&mut self) -> ImageBufferMut<'_> {
        ImageBufferMut {
            data: &mut self.data,
            width: self.width,
            height: self.height,
            row_bytes: self.row_bytes,
        }
    }

    /// Returns the pixel at (x, y).
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Pixel8888 {
        self.view().pixel(x, y)
    }

    /// Copies the pixels out without row padding.
    pub fn to_packed(&self) -> Vec<u8> {
        let row = self.width * BYTES_PER_PIXEL;
        let mut out = Vec::with_capacity(row * self.height);
        for y in 0..self.height {
            let start = y * self.row_bytes;
            out.extend_from_slice(&self.data[start..start + row]);
        }
        out
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("row_bytes", &self.row_bytes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_layout() {
        let bytes = vec![0u8; 3 * 12 + 8];
        let view = ImageBuffer::new(&bytes, 2, 4, 12).unwrap();
        assert_eq!(view.width(), 2);
        assert_eq!(view.height(), 4);
        assert_eq!(view.row(3).len(), 2);
    }

    #[test]
    fn test_stride_too_small() {
        let bytes = [0u8; 64];
        let err = ImageBuffer::new(&bytes, 4, 2, 15).unwrap_err();
        assert!(matches!(err, Error::InvalidStride { min_stride: 16, .. }));
    }

    #[test]
    fn test_buffer_too_small() {
        let bytes = [0u8; 30];
        let err = ImageBuffer::new(&bytes, 2, 4, 8).unwrap_err();
        assert!(matches!(err, Error::BufferTooSmall { required: 32, .. }));
    }

    #[test]
    fn test_null_descriptor() {
        let view = ImageBuffer::new(&[], 8, 8, 32).unwrap();
        assert!(view.is_null());
        assert_eq!(view.get_pixel(0, 0), None);
    }

    #[test]
    fn test_padding_untouched() {
        let mut bytes = vec![0xAAu8; 2 * 12];
        {
            let mut view = ImageBufferMut::new(&mut bytes, 2, 2, 12).unwrap();
            view.fill([1, 2, 3, 4]);
            assert_eq!(view.pixel(1, 1), [1, 2, 3, 4]);
        }
        assert_eq!(&bytes[8..12], &[0xAA; 4]);
        assert_eq!(&bytes[20..24], &[0xAA; 4]);
    }

    #[test]
    fn test_pixel_buffer_alignment() {
        let buf = PixelBuffer::new(17, 3).unwrap();
        assert_eq!(buf.row_bytes(), 32 * 4);
        assert_eq!(buf.pixel(16, 2), [0, 0, 0, 0]);
    }

    #[test]
    fn test_pixel_buffer_packed_roundtrip() {
        let packed: Vec<u8> = (0..3 * 2 * 4).map(|v| v as u8).collect();
        let buf = PixelBuffer::from_packed(3, 2, &packed).unwrap();
        assert_eq!(buf.pixel(1, 1), [16, 17, 18, 19]);
        assert_eq!(buf.to_packed(), packed);
    }

    #[test]
    fn test_pixel_buffer_wrong_length() {
        let err = PixelBuffer::from_packed(3, 2, &[0u8; 10]).unwrap_err();
        assert!(matches!(err, Error::BufferTooSmall { required: 24, .. }));
    }
}
