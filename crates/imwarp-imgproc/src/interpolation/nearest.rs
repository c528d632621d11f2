use super::border::BorderMode;
use super::interpolate::fetch_pixel;
use imwarp_image::Image;

/// Kernel for nearest neighbor interpolation
///
/// # Arguments
///
/// * `image` - The input image container.
/// * `u` - The x coordinate of the pixel to interpolate.
/// * `v` - The y coordinate of the pixel to interpolate.
/// * `border` - How to resolve a location outside of the image.
///
/// # Returns
///
/// The interpolated pixel values.
pub(crate) fn nearest_neighbor_interpolation<const C: usize>(
    image: &Image<f32, C>,
    u: f32,
    v: f32,
    border: BorderMode,
) -> [f32; C] {
    let iu = u.round() as isize;
    let iv = v.round() as isize;

    let mut pixel = [border.fill_value(); C];
    if let Some(src) = fetch_pixel(image, iu, iv, border) {
        pixel.copy_from_slice(src);
    }

    pixel
}
