//! # vimage-ops
//!
//! Box convolution for 8-bit, 4-channel images.
//!
//! The filter blurs a region of interest of a source buffer into a
//! destination buffer with a separable sliding-window box sum. Samples that
//! fall outside the source are handled by one of four edge policies.
//!
//! # Modules
//!
//! - [`convolve`] - The box filter, its builder and edge policies
//!
//! # Example
//!
//! ```rust
//! use vimage_core::PixelBuffer;
//! use vimage_ops::{BoxConvolve, EdgePolicy};
//!
//! let src = PixelBuffer::filled(32, 32, [0, 128, 128, 255]).unwrap();
//! let mut dst = PixelBuffer::new(32, 32).unwrap();
//!
//! BoxConvolve::new(9, 3)
//!     .edge(EdgePolicy::BackgroundFill([0, 0, 0, 0]))
//!     .apply(&src.view(), &mut dst.view_mut(), None)
//!     .unwrap();
//!
//! // Inside the image the mean of a constant is the constant
//! assert_eq!(dst.pixel(16, 16), [0, 128, 128, 255]);
//! ```
//!
//! # Status Codes
//!
//! Callers that need the numeric `kvImage*` protocol can map any result with
//! [`status_code`]: `0` on success, the scratch size for a size query, or a
//! negative code from [`codes`].

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod convolve;

pub use convolve::{box_convolve_argb8888, status_code, BoxConvolve, Convolved, EdgePolicy, RoiGeometry};
pub use error::{codes, OpsError, OpsResult};
