//! Pixel interpolation methods for image transformations.
//!
//! This module provides the sampling kernels used when resampling images
//! during geometric transformations like warping or remapping.
//!
//! # Interpolation Modes
//!
//! - **Nearest**: Fastest, uses nearest pixel value (no interpolation)
//! - **Bilinear**: Smooth linear interpolation between adjacent pixels
//!
//! # Border Modes
//!
//! Taps that fall outside the source image are resolved with a [`BorderMode`]:
//! a constant fill, replication of the edge pixel or reflection around the edge.

mod bilinear;
mod border;

/// Grid generation and coordinate mapping utilities.
///
/// Functions for generating coordinate meshgrids used in image warping
/// and transformation operations.
pub mod grid;

pub(crate) mod interpolate;
mod nearest;
mod remap;

pub use border::BorderMode;
pub use interpolate::{interpolate_pixel, InterpolationMode};
pub use remap::remap;
