//! Geometric image transformations using affine, perspective and elastic warps.
//!
//! This module provides functions for applying 2D transformations to images:
//!
//! - Affine transformations (rotation, translation, scaling, shearing)
//! - Perspective transformations (homographies) solved from four point pairs
//! - Sinusoidal elastic distortion through a per-pixel displacement field
//!
//! All warps take the destination image by mutable reference; its size is the
//! output canvas.
//!
//! # Examples
//!
//! Rotating an image by 45 degrees:
//!
//! ```
//! use imwarp_image::{Image, ImageSize};
//! use imwarp_imgproc::interpolation::InterpolationMode;
//! use imwarp_imgproc::warp::{get_rotation_matrix2d, warp_affine};
//!
//! let src = Image::<f32, 3>::from_size_val([256, 256].into(), 1.0).unwrap();
//! let mut dst = Image::<f32, 3>::from_size_val(src.size(), 0.0).unwrap();
//!
//! let rotation_matrix = get_rotation_matrix2d((128.0, 128.0), 45.0, 1.0);
//! warp_affine(&src, &mut dst, &rotation_matrix, InterpolationMode::Bilinear).unwrap();
//! ```

mod affine;
mod elastic;
mod perspective;

pub use affine::{
    get_rotation_matrix2d, get_scaling_matrix2d, get_shear_matrix2d, get_translation_matrix2d,
    invert_affine_transform, warp_affine,
};
pub use elastic::{get_sinusoidal_displacement_map, warp_elastic};
pub use perspective::{get_perspective_transform, warp_perspective};
