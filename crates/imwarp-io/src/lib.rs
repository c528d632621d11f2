#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
///
/// Defines [`IoError`] variants for file access, encoding/decoding failures,
/// and format-specific errors.
pub mod error;

/// High-level image reading and writing functions.
///
/// Detects the container format from the magic bytes or the file extension.
/// See [`functional::decode_image_rgb8`] for decoding uploaded bytes.
pub mod functional;

/// PNG image encoding and decoding.
pub mod png;

/// JPEG image encoding and decoding.
///
/// Pure Rust JPEG codec for reading and writing JPEG images.
pub mod jpeg;

pub use crate::error::IoError;

/// Internal utility functions for channel layout conversion.
mod conv_utils;
