use super::border::BorderMode;
use super::interpolate::fetch_pixel;
use imwarp_image::Image;

/// Kernel for bilinear interpolation
///
/// # Arguments
///
/// * `image` - The input image container.
/// * `u` - The x coordinate of the pixel to interpolate.
/// * `v` - The y coordinate of the pixel to interpolate.
/// * `border` - How to resolve the taps outside of the image.
///
/// # Returns
///
/// The interpolated pixel values.
pub(crate) fn bilinear_interpolation<const C: usize>(
    image: &Image<f32, C>,
    u: f32,
    v: f32,
    border: BorderMode,
) -> [f32; C] {
    let u0 = u.floor();
    let v0 = v.floor();

    let frac_u = u - u0;
    let frac_v = v - v0;

    let frac_uu = 1.0 - frac_u;
    let frac_vv = 1.0 - frac_v;

    let iu0 = u0 as isize;
    let iv0 = v0 as isize;
    let iu1 = iu0.saturating_add(1);
    let iv1 = iv0.saturating_add(1);

    let taps = [
        (iu0, iv0, frac_uu * frac_vv),
        (iu1, iv0, frac_u * frac_vv),
        (iu0, iv1, frac_uu * frac_v),
        (iu1, iv1, frac_u * frac_v),
    ];

    let fill = border.fill_value();
    let mut pixel = [0.0; C];

    for (x, y, w) in taps {
        if w == 0.0 {
            continue;
        }
        match fetch_pixel(image, x, y, border) {
            Some(p) => pixel.iter_mut().zip(p).for_each(|(acc, &p)| *acc += p * w),
            None => pixel.iter_mut().for_each(|acc| *acc += fill * w),
        }
    }

    pixel
}
