//! # vimage-core
//!
//! Core types shared by the vimage crates.
//!
//! - [`ImageBuffer`], [`ImageBufferMut`] - borrowed descriptors over caller-owned pixel memory
//! - [`PixelBuffer`] - owned, row-aligned pixel storage that hands out descriptors
//! - [`Pixel8888`] - four 8-bit lanes, channel order agnostic
//! - [`Flags`] - the per-call flag set
//!
//! ## Crate Structure
//!
//! ```text
//! vimage-core (this crate)
//!    ^
//!    |
//!    +-- vimage-ops (box convolution)
//!    +-- vimage-cli (command line)
//! ```
//!
//! ## Memory Layout
//!
//! Pixels are stored row-major, top-to-bottom. Each row starts `row_bytes`
//! after the previous one; bytes past `width * 4` within a row are padding
//! and are never read or written:
//!
//! ```text
//! Memory: [A R G B A R G B ... pad]  <- Row 0
//!         [A R G B A R G B ... pad]  <- Row 1
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod buffer;
pub mod error;
pub mod flags;
pub mod pixel;

pub use buffer::{ImageBuffer, ImageBufferMut, PixelBuffer, ROW_ALIGNMENT_PIXELS};
pub use error::{Error, Result};
pub use flags::Flags;
pub use pixel::{Pixel8888, BYTES_PER_PIXEL, CHANNELS};

/// Prelude module for convenient imports.
///
/// ```
/// use vimage_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::buffer::{ImageBuffer, ImageBufferMut, PixelBuffer};
    pub use crate::error::{Error, Result};
    pub use crate::flags::Flags;
    pub use crate::pixel::Pixel8888;
}
