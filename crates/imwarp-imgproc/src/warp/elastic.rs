use std::f32::consts::PI;

use imwarp_image::{Image, ImageError, ImageSize};

use crate::interpolation::{grid::meshgrid_from_fn, remap, BorderMode, InterpolationMode};

/// Builds a sinusoidal displacement field.
///
/// Every pixel `(x, y)` is displaced along each axis by one period of a sine
/// wave spanning the canvas:
///
/// ```text
/// map_x(y, x) = x + amplitude_x * sin(2 * pi * x / width)
/// map_y(y, x) = y + amplitude_y * sin(2 * pi * y / height)
/// ```
///
/// # Arguments
///
/// * `size` - The size of the displacement field.
/// * `amplitude_x` - Peak horizontal displacement in pixels.
/// * `amplitude_y` - Peak vertical displacement in pixels.
pub fn get_sinusoidal_displacement_map(
    size: ImageSize,
    amplitude_x: f32,
    amplitude_y: f32,
) -> Result<(Image<f32, 1>, Image<f32, 1>), ImageError> {
    let (cols, rows) = (size.width as f32, size.height as f32);

    meshgrid_from_fn(size.width, size.height, |x, y| {
        let (x, y) = (x as f32, y as f32);
        let u = x + amplitude_x * (2.0 * PI * x / cols).sin();
        let v = y + amplitude_y * (2.0 * PI * y / rows).sin();
        Ok((u, v))
    })
}

/// Applies a sinusoidal elastic distortion to an image.
///
/// Samples outside of the source are mirrored back into it, so the canvas
/// never shows an empty border.
///
/// # Arguments
///
/// * `src` - The input image with shape (height, width, channels).
/// * `dst` - The output image, same size as `src`.
/// * `amplitude_x` - Peak horizontal displacement in pixels.
/// * `amplitude_y` - Peak vertical displacement in pixels.
/// * `interpolation` - The interpolation mode to use.
///
/// # Example
///
/// ```
/// use imwarp_image::Image;
/// use imwarp_imgproc::interpolation::InterpolationMode;
/// use imwarp_imgproc::warp::warp_elastic;
///
/// let src = Image::<f32, 3>::from_size_val([32, 16].into(), 1.0).unwrap();
/// let mut dst = Image::<f32, 3>::from_size_val(src.size(), 0.0).unwrap();
///
/// warp_elastic(&src, &mut dst, 5.0, -5.0, InterpolationMode::Bilinear).unwrap();
///
/// assert!(dst.as_slice().iter().all(|&v| (v - 1.0).abs() < 1e-6));
/// ```
pub fn warp_elastic<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    amplitude_x: f32,
    amplitude_y: f32,
    interpolation: InterpolationMode,
) -> Result<(), ImageError> {
    let (map_x, map_y) = get_sinusoidal_displacement_map(src.size(), amplitude_x, amplitude_y)?;

    remap(
        src,
        dst,
        &map_x,
        &map_y,
        interpolation,
        BorderMode::Reflect,
    )
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use imwarp_image::{Image, ImageError, ImageSize};

    use super::InterpolationMode;

    #[test]
    fn displacement_map_zero_amplitude_is_meshgrid() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 5,
            height: 3,
        };
        let (map_x, map_y) = super::get_sinusoidal_displacement_map(size, 0.0, 0.0)?;
        let (grid_x, grid_y) = crate::interpolation::grid::meshgrid(size)?;

        assert_eq!(map_x, grid_x);
        assert_eq!(map_y, grid_y);

        Ok(())
    }

    #[test]
    fn displacement_map_peaks() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 8,
            height: 4,
        };
        let (map_x, map_y) = super::get_sinusoidal_displacement_map(size, 3.0, 2.0)?;

        // a quarter period into the canvas the sine is at its maximum
        assert_relative_eq!(map_x.get_pixel(2, 0, 0)?, 5.0, epsilon = 1e-5);
        assert_relative_eq!(map_x.get_pixel(6, 3, 0)?, 3.0, epsilon = 1e-5);
        assert_relative_eq!(map_y.get_pixel(0, 1, 0)?, 3.0, epsilon = 1e-5);
        assert_relative_eq!(map_y.get_pixel(0, 0, 0)?, 0.0, epsilon = 1e-5);

        Ok(())
    }

    #[test]
    fn warp_elastic_zero_is_identity() -> Result<(), ImageError> {
        let image = Image::<_, 3>::new(
            ImageSize {
                width: 4,
                height: 3,
            },
            (0..36).map(|x| x as f32).collect(),
        )?;
        let mut image_transformed = Image::<_, 3>::from_size_val(image.size(), 0.0)?;

        super::warp_elastic(
            &image,
            &mut image_transformed,
            0.0,
            0.0,
            InterpolationMode::Bilinear,
        )?;

        assert_eq!(image_transformed.as_slice(), image.as_slice());

        Ok(())
    }

    #[test]
    fn warp_elastic_reflects_at_border() -> Result<(), ImageError> {
        let image = Image::<_, 1>::new([4, 1].into(), vec![1.0f32, 2.0, 3.0, 4.0])?;
        let mut image_transformed = Image::<_, 1>::from_size_val(image.size(), 0.0)?;

        super::warp_elastic(
            &image,
            &mut image_transformed,
            -2.0,
            0.0,
            InterpolationMode::Nearest,
        )?;

        // x = 1 samples at -1, which mirrors back onto the first pixel
        assert_eq!(image_transformed.get_pixel(1, 0, 0)?, 1.0);
        assert!(image_transformed.as_slice().iter().all(|&v| v > 0.0));

        Ok(())
    }

    #[test]
    fn warp_elastic_size_mismatch() -> Result<(), ImageError> {
        let image = Image::<_, 1>::from_size_val([4, 4].into(), 0.0f32)?;
        let mut image_transformed = Image::<_, 1>::from_size_val([2, 2].into(), 0.0)?;

        let res = super::warp_elastic(
            &image,
            &mut image_transformed,
            1.0,
            1.0,
            InterpolationMode::Bilinear,
        );
        assert!(matches!(res, Err(ImageError::InvalidImageSize(..))));

        Ok(())
    }
}
