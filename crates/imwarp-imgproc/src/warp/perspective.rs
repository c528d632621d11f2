use crate::interpolation::{grid::meshgrid_from_fn, remap, BorderMode, InterpolationMode};

use imwarp_image::{Image, ImageError};

#[rustfmt::skip]
fn determinant3x3(m: &[f32; 9]) -> f32 {
    m[0] * (m[4] * m[8] - m[5] * m[7]) -
    m[1] * (m[3] * m[8] - m[5] * m[6]) +
    m[2] * (m[3] * m[7] - m[4] * m[6])
}

#[rustfmt::skip]
fn adjugate3x3(m: &[f32; 9]) -> [f32; 9] {
    [
        m[4] * m[8] - m[5] * m[7],  // [0, 0]
        m[2] * m[7] - m[1] * m[8],  // [0, 1]
        m[1] * m[5] - m[2] * m[4],  // [0, 2]
        m[5] * m[6] - m[3] * m[8],  // [1, 0]
        m[0] * m[8] - m[2] * m[6],  // [1, 1]
        m[2] * m[3] - m[0] * m[5],  // [1, 2]
        m[3] * m[7] - m[4] * m[6],  // [2, 0]
        m[1] * m[6] - m[0] * m[7],  // [2, 1]
        m[0] * m[4] - m[1] * m[3],  // [2, 2]
    ]
}

fn inverse_perspective_matrix(m: &[f32; 9]) -> Result<[f32; 9], ImageError> {
    let det = determinant3x3(m);

    if det == 0.0 || !det.is_finite() {
        return Err(ImageError::CannotComputeDeterminant);
    }

    let adj = adjugate3x3(m);
    let inv_det = 1.0 / det;

    Ok(adj.map(|a| a * inv_det))
}

fn transform_point(x: f32, y: f32, m: &[f32; 9]) -> (f32, f32) {
    let w = m[6] * x + m[7] * y + m[8];
    let u = (m[0] * x + m[1] * y + m[2]) / w;
    let v = (m[3] * x + m[4] * y + m[5]) / w;
    (u, v)
}

/// Computes the perspective transform mapping four source points onto four
/// destination points.
///
/// Both point sets are first normalized to zero mean and an average distance of
/// `sqrt(2)` from the origin. The homography is then the null vector of the
/// 8x9 DLT system, taken from its SVD, and is denormalized and scaled so that
/// `h33 = 1`.
///
/// # Arguments
///
/// * `src` - Four points `[x, y]` in the source image.
/// * `dst` - The four corresponding points in the destination image.
///
/// # Errors
///
/// Returns [`ImageError::CannotComputeDeterminant`] when the points are
/// degenerate, e.g. three of them are collinear.
///
/// # Example
///
/// ```
/// use imwarp_imgproc::warp::get_perspective_transform;
///
/// let src = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
/// let dst = [[0.0, 0.0], [2.0, 0.0], [0.0, 2.0], [2.0, 2.0]];
///
/// let m = get_perspective_transform(&src, &dst).unwrap();
/// assert!((m[0] - 2.0).abs() < 1e-5);
/// assert!((m[4] - 2.0).abs() < 1e-5);
/// ```
pub fn get_perspective_transform(
    src: &[[f32; 2]; 4],
    dst: &[[f32; 2]; 4],
) -> Result<[f32; 9], ImageError> {
    let (src_n, t_src) = normalize_points(src)?;
    let (dst_n, t_dst_inv) = {
        let (points, t) = normalize_points(dst)?;
        (points, similarity_inverse(&t))
    };

    // construct matrix A, two rows per correspondence
    let mat_a = faer::Mat::<f64>::from_fn(8, 9, |row, col| {
        let ([x, y], [u, v]) = (src_n[row / 2], dst_n[row / 2]);
        let coeffs = if row % 2 == 0 {
            [x, y, 1.0, 0.0, 0.0, 0.0, -u * x, -u * y, -u]
        } else {
            [0.0, 0.0, 0.0, x, y, 1.0, -v * x, -v * y, -v]
        };
        coeffs[col]
    });

    // the right singular vector of the smallest singular value
    let svd = mat_a.svd();
    let h = svd.v().col(8);

    let norm = (0..9).map(|i| h[i] * h[i]).sum::<f64>().sqrt();
    if norm == 0.0 || !norm.is_finite() {
        return Err(ImageError::CannotComputeDeterminant);
    }

    let h_norm = faer::mat![
        [h[0] / norm, h[1] / norm, h[2] / norm],
        [h[3] / norm, h[4] / norm, h[5] / norm],
        [h[6] / norm, h[7] / norm, h[8] / norm]
    ];

    if determinant_mat(&h_norm).abs() < 1e-8 {
        return Err(ImageError::CannotComputeDeterminant);
    }

    // denormalize: H = T_dst^-1 * H_norm * T_src
    let homo = t_dst_inv * h_norm * t_src;

    let scale = homo.read(2, 2);
    let scale = if scale.abs() > 1e-12 { scale } else { 1.0 };

    let mut m = [0.0f32; 9];
    for (i, v) in m.iter_mut().enumerate() {
        *v = (homo.read(i / 3, i % 3) / scale) as f32;
    }

    if m.iter().any(|v| !v.is_finite()) {
        return Err(ImageError::CannotComputeDeterminant);
    }

    Ok(m)
}

// zero mean and sqrt(2) average distance; coincident points cannot be normalized
fn normalize_points(
    points: &[[f32; 2]; 4],
) -> Result<([[f64; 2]; 4], faer::Mat<f64>), ImageError> {
    let points = points.map(|[x, y]| [x as f64, y as f64]);

    let mx = points.iter().map(|p| p[0]).sum::<f64>() / 4.0;
    let my = points.iter().map(|p| p[1]).sum::<f64>() / 4.0;

    let mean_dist = points
        .iter()
        .map(|p| ((p[0] - mx).powi(2) + (p[1] - my).powi(2)).sqrt())
        .sum::<f64>()
        / 4.0;

    if mean_dist < 1e-9 || !mean_dist.is_finite() {
        return Err(ImageError::CannotComputeDeterminant);
    }

    let scale = 2.0f64.sqrt() / mean_dist;
    let normalized = points.map(|[x, y]| [(x - mx) * scale, (y - my) * scale]);

    let t = faer::mat![
        [scale, 0.0, -scale * mx],
        [0.0, scale, -scale * my],
        [0.0, 0.0, 1.0]
    ];

    Ok((normalized, t))
}

// inverse of [[s, 0, tx], [0, s, ty], [0, 0, 1]]
fn similarity_inverse(t: &faer::Mat<f64>) -> faer::Mat<f64> {
    let s = t.read(0, 0);
    faer::mat![
        [1.0 / s, 0.0, -t.read(0, 2) / s],
        [0.0, 1.0 / s, -t.read(1, 2) / s],
        [0.0, 0.0, 1.0]
    ]
}

fn determinant_mat(m: &faer::Mat<f64>) -> f64 {
    m.read(0, 0) * (m.read(1, 1) * m.read(2, 2) - m.read(1, 2) * m.read(2, 1))
        - m.read(0, 1) * (m.read(1, 0) * m.read(2, 2) - m.read(1, 2) * m.read(2, 0))
        + m.read(0, 2) * (m.read(1, 0) * m.read(2, 1) - m.read(1, 1) * m.read(2, 0))
}

/// Applies a perspective transformation to an image.
///
/// * `src` - The input image with shape (height, width, channels).
/// * `dst` - The output image with shape (height, width, channels).
/// * `m` - The 3x3 perspective transformation matrix src -> dst.
/// * `interpolation` - The interpolation mode to use.
///
/// Destination pixels that map outside of the source are filled with zeros.
///
/// # Example
///
/// ```
/// use imwarp_image::{Image, ImageSize};
/// use imwarp_imgproc::interpolation::InterpolationMode;
/// use imwarp_imgproc::warp::warp_perspective;
///
/// let src = Image::<f32, 1>::new(
///   ImageSize {
///     width: 4,
///     height: 5,
///   },
///   vec![0.0f32; 4 * 5]
/// ).unwrap();
///
/// let m = [1.0, 0.0, -1.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0];
///
/// let mut dst = Image::<f32, 1>::from_size_val(src.size(), 0.0).unwrap();
///
/// warp_perspective(&src, &mut dst, &m, InterpolationMode::Bilinear).unwrap();
///
/// assert_eq!(dst.size(), src.size());
/// ```
pub fn warp_perspective<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    m: &[f32; 9],
    interpolation: InterpolationMode,
) -> Result<(), ImageError> {
    let inv_m = inverse_perspective_matrix(m)?;

    // create meshgrid to find corresponding positions in src from dst
    let (map_x, map_y) = meshgrid_from_fn(dst.cols(), dst.rows(), |x, y| {
        Ok(transform_point(x as f32, y as f32, &inv_m))
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
