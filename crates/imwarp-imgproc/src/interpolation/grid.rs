use imwarp_image::{Image, ImageError, ImageSize};

/// Create a meshgrid of x and y coordinates
///
/// # Arguments
///
/// * `size` - The size of the grid.
///
/// # Returns
///
/// A tuple of single channel images of the given size containing the x and y
/// coordinates of every pixel.
pub fn meshgrid(size: ImageSize) -> Result<(Image<f32, 1>, Image<f32, 1>), ImageError> {
    meshgrid_from_fn(size.width, size.height, |x, y| Ok((x as f32, y as f32)))
}

/// Create a pair of coordinate maps by evaluating `f` at every grid location.
///
/// # Arguments
///
/// * `cols` - The number of columns indicating the width of the grid
/// * `rows` - The number of rows indicating the height of the grid
/// * `f` - Maps the integer location `(x, y)` to the sampling position `(u, v)`.
pub fn meshgrid_from_fn(
    cols: usize,
    rows: usize,
    f: impl Fn(usize, usize) -> Result<(f32, f32), ImageError>,
) -> Result<(Image<f32, 1>, Image<f32, 1>), ImageError> {
    let mut map_x = Vec::with_capacity(rows * cols);
    let mut map_y = Vec::with_capacity(rows * cols);

    for y in 0..rows {
        for x in 0..cols {
            let (u, v) = f(x, y)?;
            map_x.push(u);
            map_y.push(v);
        }
    }

    let size = ImageSize {
        width: cols,
        height: rows,
    };

    Ok((Image::new(size, map_x)?, Image::new(size, map_y)?))
}
