//! The 4-channel, 8-bit-per-channel pixel.
//!
//! The filter treats the four channels as independent lanes, so the same type
//! serves ARGB, RGBA and BGRA data alike.

/// Number of channels per pixel.
pub const CHANNELS: usize = 4;

/// Size of one pixel in bytes.
pub const BYTES_PER_PIXEL: usize = CHANNELS;

/// Four 8-bit lanes.
///
/// A plain array so slices of pixels can be cast to and from byte slices
/// with [`bytemuck`].
pub type Pixel8888 = [u8; CHANNELS];

/// Returns `true` if all lanes of `px` equal `value`.
#[inline]
pub fn is_uniform(px: Pixel8888, value: u8) -> bool {
    px.iter().all(|&lane| lane == value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_size() {
        assert_eq!(std::mem::size_of::<Pixel8888>(), BYTES_PER_PIXEL);
        assert_eq!(std::mem::align_of::<Pixel8888>(), 1);
    }

    #[test]
    fn test_is_uniform() {
        assert!(is_uniform([7, 7, 7, 7], 7));
        assert!(!is_uniform([7, 7, 0, 7], 7));
    }
}
