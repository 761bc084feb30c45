//! Error types for buffer construction.
//!
//! These cover describing memory as an image: strides, lengths and
//! allocation of owned buffers. Failures of the filter itself live in
//! `vimage-ops`.
//!
//! # Usage
//!
//! ```rust
//! use vimage_core::{Error, ImageBuffer};
//!
//! let bytes = [0u8; 16];
//! let err = ImageBuffer::new(&bytes, 4, 1, 8).unwrap_err();
//! assert!(matches!(err, Error::InvalidStride { .. }));
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while describing or allocating pixel memory.
#[derive(Debug, Error)]
pub enum Error {
    /// Row stride is too small for the given width.
    ///
    /// Every row must hold at least `width * 4` bytes.
    #[error("stride {stride} is less than minimum {min_stride} for width {width}")]
    InvalidStride {
        /// Provided stride in bytes
        stride: usize,
        /// Minimum required stride in bytes
        min_stride: usize,
        /// Image width in pixels
        width: usize,
    },

    /// The byte slice does not cover the described image.
    #[error("buffer of {len} bytes is too small, {required} bytes required")]
    BufferTooSmall {
        /// Length of the provided slice
        len: usize,
        /// Bytes needed for the described rows
        required: usize,
    },

    /// Dimensions overflow the address space when converted to bytes.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: usize,
        /// Requested height
        height: usize,
        /// Reason why dimensions are invalid
        reason: String,
    },

    /// Memory allocation failed.
    #[error("failed to allocate {requested} bytes: {reason}")]
    AllocationFailed {
        /// Bytes requested
        requested: usize,
        /// Failure reason
        reason: String,
    },
}

impl Error {
    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: usize, height: usize, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::AllocationFailed`] error.
    #[inline]
    pub fn allocation_failed(requested: usize, reason: impl Into<String>) -> Self {
        Self::AllocationFailed {
            requested,
            reason: reason.into(),
        }
    }

    /// Returns `true` if this is an allocation error.
    #[inline]
    pub fn is_allocation_error(&self) -> bool {
        matches!(self, Self::AllocationFailed { .. })
    }
}
