use std::f32::consts::PI;

use imwarp_image::{Image, ImageError};

use crate::interpolation::{grid::meshgrid_from_fn, remap, BorderMode, InterpolationMode};

/// Inverts a 2x3 affine transformation matrix.
///
/// Arguments:
///
/// * `m` - The 2x3 affine transformation matrix.
///
/// Returns:
///
/// The inverted 2x3 affine transformation matrix. A singular matrix yields
/// the zero matrix, like OpenCV's `invertAffineTransform`.
pub fn invert_affine_transform(m: &[f32; 6]) -> [f32; 6] {
    let (a, b, c, d, e, f) = (m[0], m[1], m[2], m[3], m[4], m[5]);

    let determinant = a * e - b * d;
    let inv_determinant = if determinant != 0.0 {
        1.0 / determinant
    } else {
        0.0
    };

    let new_a = e * inv_determinant;
    let new_b = -b * inv_determinant;
    let new_d = -d * inv_determinant;
    let new_e = a * inv_determinant;
    let new_c = -(new_a * c + new_b * f);
    let new_f = -(new_d * c + new_e * f);

    [new_a, new_b, new_c, new_d, new_e, new_f]
}

/// Returns a 2x3 matrix translating by `(tx, ty)` pixels.
///
/// ```
/// use imwarp_imgproc::warp::get_translation_matrix2d;
///
/// assert_eq!(get_translation_matrix2d(100.0, 50.0), [1.0, 0.0, 100.0, 0.0, 1.0, 50.0]);
/// ```
pub fn get_translation_matrix2d(tx: f32, ty: f32) -> [f32; 6] {
    [1.0, 0.0, tx, 0.0, 1.0, ty]
}

/// Returns a 2x3 rotation matrix for a 2D rotation around a center point.
///
/// The rotation matrix is defined as:
///
/// | alpha  beta  tx |
/// | -beta  alpha ty |
///
/// where:
///
/// alpha = scale * cos(angle)
/// beta = scale * sin(angle)
/// tx = (1 - alpha) * center.x - beta * center.y
/// ty = beta * center.x + (1 - alpha) * center.y
///
/// Positive angles rotate counter-clockwise on screen (y axis pointing down).
///
/// # Arguments
///
/// * `center` - The center point of the rotation.
/// * `angle` - The angle of rotation in degrees.
/// * `scale` - The scale factor.
///
/// # Example
///
/// ```
/// use imwarp_imgproc::warp::get_rotation_matrix2d;
///
/// let rotation_matrix = get_rotation_matrix2d((0.0, 0.0), 0.0, 1.0);
/// assert_eq!(rotation_matrix, [1.0, 0.0, 0.0, -0.0, 1.0, 0.0]);
/// ```
pub fn get_rotation_matrix2d(center: (f32, f32), angle: f32, scale: f32) -> [f32; 6] {
    let angle = angle * PI / 180.0f32;
    let alpha = scale * angle.cos();
    let beta = scale * angle.sin();

    let tx = (1.0 - alpha) * center.0 - beta * center.1;
    let ty = beta * center.0 + (1.0 - alpha) * center.1;

    [alpha, beta, tx, -beta, alpha, ty]
}

/// Returns a 2x3 matrix scaling about the origin by `(sx, sy)`.
pub fn get_scaling_matrix2d(sx: f32, sy: f32) -> [f32; 6] {
    [sx, 0.0, 0.0, 0.0, sy, 0.0]
}

/// Returns a 2x3 shear matrix: `x' = x + shx * y`, `y' = shy * x + y`.
pub fn get_shear_matrix2d(shx: f32, shy: f32) -> [f32; 6] {
    [1.0, shx, 0.0, shy, 1.0, 0.0]
}

/// Applies an affine transformation to a point.
fn transform_point(x: f32, y: f32, m: &[f32; 6]) -> (f32, f32) {
    let u = m[0] * x + m[1] * y + m[2];
    let v = m[3] * x + m[4] * y + m[5];
    (u, v)
}

/// Applies an affine transformation to an image.
///
/// The matrix maps source coordinates to destination coordinates. Destination
/// pixels that map outside of the source are filled with zeros.
///
/// # Arguments
///
/// * `src` - The input image with shape (height, width, channels).
/// * `dst` - The output image with shape (height, width, channels).
/// * `m` - The 2x3 affine transformation matrix.
/// * `interpolation` - The interpolation mode to use.
///
/// # Example
///
/// ```
/// use imwarp_image::{Image, ImageSize};
/// use imwarp_imgproc::interpolation::InterpolationMode;
/// use imwarp_imgproc::warp::warp_affine;
///
/// let src = Image::<_, 3>::from_size_val(
///    ImageSize {
///       width: 4,
///       height: 5,
///    },
///    1f32,
/// ).unwrap();
///
/// let m = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
///
/// let mut dst = Image::<_, 3>::from_size_val(src.size(), 0.0).unwrap();
///
/// warp_affine(&src, &mut dst, &m, InterpolationMode::Nearest).unwrap();
///
/// assert_eq!(dst.as_slice(), src.as_slice());
/// ```
pub fn warp_affine<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    m: &[f32; 6],
    interpolation: InterpolationMode,
) -> Result<(), ImageError> {
    // invert affine transform matrix to find corresponding positions in src from dst
    let m_inv = invert_affine_transform(m);

    let (map_x, map_y) = meshgrid_from_fn(dst.cols(), dst.rows(), |x, y| {
        Ok(transform_point(x as f32, y as f32, &m_inv))
    })?;

    remap(
        src,
        dst,
        &map_x,
        &map_y,
        interpolation,
        BorderMode::Constant(0.0),
    )
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use imwarp_image::{Image, ImageError, ImageSize};

    use super::InterpolationMode;

    #[test]
    fn warp_affine_smoke_ch3() -> Result<(), ImageError> {
        let image = Image::<_, 3>::new(
            ImageSize {
                width: 4,
                height: 5,
            },
            vec![0f32; 4 * 5 * 3],
        )?;

        let new_size = ImageSize {
            width: 2,
            height: 3,
        };

        let mut image_transformed = Image::<_, 3>::from_size_val(new_size, 0.0)?;

        super::warp_affine(
            &image,
            &mut image_transformed,
            &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            InterpolationMode::Bilinear,
        )?;

        assert_eq!(image_transformed.num_channels(), 3);
        assert_eq!(image_transformed.size(), new_size);

        Ok(())
    }

    #[test]
    fn warp_affine_correctness_identity() -> Result<(), ImageError> {
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 4,
                height: 5,
            },
            (0..20).map(|x| x as f32).collect(),
        )?;

        let mut image_transformed = Image::<_, 1>::from_size_val(image.size(), 0.0)?;

        super::warp_affine(
            &image,
            &mut image_transformed,
            &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            InterpolationMode::Bilinear,
        )?;

        assert_eq!(image_transformed.as_slice(), image.as_slice());
        assert_eq!(image_transformed.size(), image.size());

        Ok(())
    }

    #[test]
    fn warp_affine_correctness_rot90() -> Result<(), ImageError> {
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![0.0f32, 1.0f32, 2.0f32, 3.0f32],
        )?;

        let mut image_transformed = Image::<_, 1>::from_size_val(image.size(), 0.0)?;

        super::warp_affine(
            &image,
            &mut image_transformed,
            &super::get_rotation_matrix2d((0.5, 0.5), 90.0, 1.0),
            InterpolationMode::Nearest,
        )?;

        assert_eq!(
            image_transformed.as_slice(),
            &[1.0f32, 3.0f32, 0.0f32, 2.0f32]
        );

        Ok(())
    }

    #[test]
    fn warp_affine_translation() -> Result<(), ImageError> {
        let image = Image::<_, 1>::new([4, 1].into(), vec![1.0f32, 2.0, 3.0, 4.0])?;
        let mut image_transformed = Image::<_, 1>::from_size_val(image.size(), -1.0)?;

        super::warp_affine(
            &image,
            &mut image_transformed,
            &super::get_translation_matrix2d(1.0, 0.0),
            InterpolationMode::Bilinear,
        )?;

        assert_eq!(image_transformed.as_slice(), &[0.0, 1.0, 2.0, 3.0]);

        Ok(())
    }

    #[test]
    fn warp_affine_scaling_about_origin() -> Result<(), ImageError> {
        let image = Image::<_, 1>::new([2, 1].into(), vec![4.0f32, 8.0])?;
        let mut image_transformed = Image::<_, 1>::from_size_val([4, 1].into(), 0.0)?;

        super::warp_affine(
            &image,
            &mut image_transformed,
            &super::get_scaling_matrix2d(2.0, 1.0),
            InterpolationMode::Bilinear,
        )?;

        // the last sample blends the edge pixel with the zero border
        assert_eq!(image_transformed.as_slice(), &[4.0, 6.0, 8.0, 4.0]);

        Ok(())
    }

    #[test]
    fn shear_matrix_maps_points() {
        let m = super::get_shear_matrix2d(0.5, 0.25);
        let (u, v) = super::transform_point(2.0, 4.0, &m);
        assert_relative_eq!(u, 4.0);
        assert_relative_eq!(v, 4.5);
    }

    #[test]
    fn invert_affine_roundtrip() {
        let m = super::get_rotation_matrix2d((10.0, 20.0), 30.0, 1.5);
        let m_inv = super::invert_affine_transform(&m);
        let (u, v) = super::transform_point(3.0, 7.0, &m);
        let (x, y) = super::transform_point(u, v, &m_inv);
        assert_relative_eq!(x, 3.0, epsilon = 1e-4);
        assert_relative_eq!(y, 7.0, epsilon = 1e-4);
    }

    #[test]
    fn invert_affine_singular() {
        let m_inv = super::invert_affine_transform(&super::get_scaling_matrix2d(0.0, 1.0));
        assert_eq!(m_inv, [0.0; 6]);
    }

    #[test]
    fn rotation_zero_is_identity() {
        let m = super::get_rotation_matrix2d((64.0, 48.0), 0.0, 1.0);
        assert_eq!(m, [1.0, 0.0, 0.0, -0.0, 1.0, 0.0]);
    }
}
