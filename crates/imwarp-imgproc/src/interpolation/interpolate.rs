use super::bilinear::bilinear_interpolation;
use super::border::BorderMode;
use super::nearest::nearest_neighbor_interpolation;
use imwarp_image::Image;

/// Interpolation mode for the resampling operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationMode {
    /// Bilinear interpolation
    #[default]
    Bilinear,
    /// Nearest neighbor interpolation
    Nearest,
}

impl std::str::FromStr for InterpolationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bilinear" | "linear" => Ok(InterpolationMode::Bilinear),
            "nearest" => Ok(InterpolationMode::Nearest),
            _ => Err(format!("unknown interpolation mode: {s}")),
        }
    }
}

/// Kernel for interpolating a pixel value
///
/// # Arguments
///
/// * `image` - The input image container with shape (height, width, C).
/// * `u` - The x coordinate of the pixel to interpolate.
/// * `v` - The y coordinate of the pixel to interpolate.
/// * `interpolation` - The interpolation mode to use.
/// * `border` - How to resolve taps outside of the image.
///
/// # Returns
///
/// The interpolated pixel values. Non-finite coordinates yield the border fill value.
pub fn interpolate_pixel<const C: usize>(
    image: &Image<f32, C>,
    u: f32,
    v: f32,
    interpolation: InterpolationMode,
    border: BorderMode,
) -> [f32; C] {
    if !u.is_finite() || !v.is_finite() {
        return [border.fill_value(); C];
    }

    match interpolation {
        InterpolationMode::Bilinear => bilinear_interpolation(image, u, v, border),
        InterpolationMode::Nearest => nearest_neighbor_interpolation(image, u, v, border),
    }
}

/// Fetch the pixel at an integer location, resolving it through the border mode.
#[inline]
pub(crate) fn fetch_pixel<const C: usize>(
    image: &Image<f32, C>,
    x: isize,
    y: isize,
    border: BorderMode,
) -> Option<&[f32]> {
    let ix = border.map_index(x, image.cols())?;
    let iy = border.map_index(y, image.rows())?;
    let base = (iy * image.cols() + ix) * C;
    image.as_slice().get(base..base + C)
}

#[cfg(test)]
mod tests {
    use super::*;
    use imwarp_image::{ImageError, ImageSize};

    #[test]
    fn interpolation_mode_from_str() {
        assert_eq!(
            "Bilinear".parse::<InterpolationMode>(),
            Ok(InterpolationMode::Bilinear)
        );
        assert_eq!(
            "nearest".parse::<InterpolationMode>(),
            Ok(InterpolationMode::Nearest)
        );
        assert!("cubic".parse::<InterpolationMode>().is_err());
    }

    #[test]
    fn interpolate_non_finite() -> Result<(), ImageError> {
        let image = Image::<f32, 2>::from_size_val(
            ImageSize {
                width: 2,
                height: 2,
            },
            1.0,
        )?;
        let pixel = interpolate_pixel(
            &image,
            f32::NAN,
            0.0,
            InterpolationMode::Bilinear,
            BorderMode::Constant(5.0),
        );
        assert_eq!(pixel, [5.0, 5.0]);
        Ok(())
    }
}
