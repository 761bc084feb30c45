//! Error types for the box filter.
//!
//! Every variant maps to one of the negative `kvImage*` status codes through
//! [`OpsError::code`], so callers that speak the numeric protocol can keep
//! doing so.

use thiserror::Error;
use vimage_core::Flags;

/// Numeric status codes returned by [`OpsError::code`] and
/// [`Convolved::status`](crate::Convolved::status).
pub mod codes {
    /// Success.
    pub const NO_ERROR: isize = 0;
    /// ROI extends past the source buffer.
    pub const ROI_LARGER_THAN_INPUT_BUFFER: isize = -21766;
    /// Kernel width or height is even.
    pub const INVALID_KERNEL_SIZE: isize = -21767;
    /// Zero or several edge styles selected.
    pub const INVALID_EDGE_STYLE: isize = -21768;
    /// X offset outside the source.
    pub const INVALID_OFFSET_X: isize = -21769;
    /// Y offset outside the source.
    pub const INVALID_OFFSET_Y: isize = -21770;
    /// Scratch memory could not be obtained.
    pub const MEMORY_ALLOCATION_ERROR: isize = -21771;
    /// Missing buffer data or background color.
    pub const NULL_POINTER_ARGUMENT: isize = -21772;
    /// A size-like parameter is out of range.
    pub const INVALID_PARAMETER: isize = -21773;
    /// Caller scratch buffer is smaller than required.
    pub const BUFFER_SIZE_MISMATCH: isize = -21774;
    /// Flag bits outside the known set.
    pub const UNKNOWN_FLAGS_BIT: isize = -21775;
}

/// Error type for the box filter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OpsError {
    /// A buffer has no data, or background fill was requested without a color.
    #[error("null argument: {0}")]
    NullPointerArgument(&'static str),

    /// Kernel dimensions must both be odd.
    #[error("invalid kernel size {width}x{height}: both dimensions must be odd")]
    InvalidKernelSize {
        /// Kernel width
        width: u32,
        /// Kernel height
        height: u32,
    },

    /// X offset lies past the source width.
    #[error("offset_x {offset} exceeds source width {width}")]
    InvalidOffsetX {
        /// Requested offset
        offset: usize,
        /// Source width
        width: usize,
    },

    /// Y offset lies past the source height.
    #[error("offset_y {offset} exceeds source height {height}")]
    InvalidOffsetY {
        /// Requested offset
        offset: usize,
        /// Source height
        height: usize,
    },

    /// The ROI does not fit inside the source.
    #[error("roi larger than input buffer: {0}")]
    RoiLargerThanInputBuffer(String),

    /// Not exactly one edge style was selected.
    #[error("invalid edge style: {0:?}")]
    InvalidEdgeStyle(Flags),

    /// Flag bits no flag constant defines.
    #[error("unknown flag bits {0:#x}")]
    UnknownFlagsBit(u32),

    /// A size-like parameter is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Scratch memory could not be obtained.
    #[error("memory allocation error: {0}")]
    MemoryAllocationError(String),

    /// Caller scratch buffer is too small.
    #[error("scratch buffer of {len} bytes is smaller than the required {required}")]
    BufferSizeMismatch {
        /// Bytes supplied
        len: usize,
        /// Bytes required
        required: usize,
    },
}

impl OpsError {
    /// Returns the numeric `kvImage*` status for this error.
    pub fn code(&self) -> isize {
        match self {
            Self::NullPointerArgument(_) => codes::NULL_POINTER_ARGUMENT,
            Self::InvalidKernelSize { .. } => codes::INVALID_KERNEL_SIZE,
            Self::InvalidOffsetX { .. } => codes::INVALID_OFFSET_X,
            Self::InvalidOffsetY { .. } => codes::INVALID_OFFSET_Y,
            Self::RoiLargerThanInputBuffer(_) => codes::ROI_LARGER_THAN_INPUT_BUFFER,
            Self::InvalidEdgeStyle(_) => codes::INVALID_EDGE_STYLE,
            Self::UnknownFlagsBit(_) => codes::UNKNOWN_FLAGS_BIT,
            Self::InvalidParameter(_) => codes::INVALID_PARAMETER,
            Self::MemoryAllocationError(_) => codes::MEMORY_ALLOCATION_ERROR,
            Self::BufferSizeMismatch { .. } => codes::BUFFER_SIZE_MISMATCH,
        }
    }
}

/// Result type for filter operations.
pub type OpsResult<T> = Result<T, OpsError>;
