#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Command line arguments of the binaries.
pub mod config;

/// Error type of the app and its HTTP mapping.
pub mod error;

/// Multipart form parsing.
pub mod form;

/// HTML rendering of the upload page.
pub mod page;

/// Numeric ranges and defaults of the form fields.
pub mod params;

/// The axum router and its handlers.
pub mod server;

/// The transformation catalog and its application to images.
pub mod transform;

pub use crate::error::AppError;
pub use crate::transform::{TransformKind, Transformation};
