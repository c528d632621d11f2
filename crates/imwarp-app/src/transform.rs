use std::{fmt, str::FromStr};

use serde::Serialize;

use imwarp::{
    image::{ops, Image, ImageError, ImageSize},
    imgproc::{interpolation::InterpolationMode, warp},
};

use crate::{
    error::AppError,
    params::{self, ParamRange},
};

/// Inset in pixels of the perspective destination quad from the canvas edges.
pub const PERSPECTIVE_INSET: f32 = 10.0;

/// The entries of the transformation selector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TransformKind {
    /// Show the decoded image unchanged.
    #[default]
    Original,
    /// Shift by a number of pixels.
    Translation,
    /// Rotate about the image center.
    Rotation,
    /// Scale about the origin.
    Scaling,
    /// Shear along both axes.
    Shearing,
    /// Map four corners onto the inset canvas.
    Perspective,
    /// Sinusoidal displacement field.
    ElasticDistortion,
}

impl TransformKind {
    /// Every kind in selector order.
    pub const ALL: [TransformKind; 7] = [
        TransformKind::Original,
        TransformKind::Translation,
        TransformKind::Rotation,
        TransformKind::Scaling,
        TransformKind::Shearing,
        TransformKind::Perspective,
        TransformKind::ElasticDistortion,
    ];

    /// The label shown in the selector and in captions.
    pub fn label(self) -> &'static str {
        match self {
            TransformKind::Original => "Original",
            TransformKind::Translation => "Translation",
            TransformKind::Rotation => "Rotation",
            TransformKind::Scaling => "Scaling",
            TransformKind::Shearing => "Shearing",
            TransformKind::Perspective => "Perspective",
            TransformKind::ElasticDistortion => "Elastic Distortion",
        }
    }

    /// The value submitted by the selector.
    pub fn slug(self) -> &'static str {
        match self {
            TransformKind::Original => "original",
            TransformKind::Translation => "translation",
            TransformKind::Rotation => "rotation",
            TransformKind::Scaling => "scaling",
            TransformKind::Shearing => "shearing",
            TransformKind::Perspective => "perspective",
            TransformKind::ElasticDistortion => "elastic",
        }
    }

    /// The numeric fields of this kind, in the order [`Transformation::values`] uses.
    ///
    /// Perspective corners depend on the image extent; pass `None` when no
    /// image is known yet.
    pub fn params(self, size: Option<ImageSize>) -> Vec<ParamRange> {
        match self {
            TransformKind::Original => vec![],
            TransformKind::Translation => vec![params::TRANSLATION_X, params::TRANSLATION_Y],
            TransformKind::Rotation => vec![params::ROTATION_ANGLE],
            TransformKind::Scaling => vec![params::SCALING_X, params::SCALING_Y],
            TransformKind::Shearing => vec![params::SHEARING_X, params::SHEARING_Y],
            TransformKind::Perspective => params::corner_ranges(size).to_vec(),
            TransformKind::ElasticDistortion => {
                vec![params::X_DISPLACEMENT, params::Y_DISPLACEMENT]
            }
        }
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TransformKind {
    type Err = AppError;

    /// Accepts the slug or the label, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        TransformKind::ALL
            .into_iter()
            .find(|kind| kind.slug().eq_ignore_ascii_case(s) || kind.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| AppError::UnknownTransformation(s.to_string()))
    }
}

/// One entry of the transformation catalog.
#[derive(Debug, Serialize)]
pub struct CatalogEntry {
    /// The selector value.
    pub slug: &'static str,
    /// The display label.
    pub label: &'static str,
    /// The numeric fields.
    pub params: Vec<ParamRange>,
}

/// Lists every kind with its fields.
pub fn catalog(size: Option<ImageSize>) -> Vec<CatalogEntry> {
    TransformKind::ALL
        .into_iter()
        .map(|kind| CatalogEntry {
            slug: kind.slug(),
            label: kind.label(),
            params: kind.params(size),
        })
        .collect()
}

/// A transformation together with its parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Transformation {
    /// Identity.
    Original,
    /// Shift by `(x, y)` pixels.
    Translation {
        /// horizontal shift
        x: f32,
        /// vertical shift
        y: f32,
    },
    /// Rotation in degrees about the image center, counter-clockwise.
    Rotation {
        /// angle in degrees
        angle: f32,
    },
    /// Scaling about the origin.
    Scaling {
        /// horizontal factor
        x: f32,
        /// vertical factor
        y: f32,
    },
    /// Shear, `x' = x + sx * y` and `y' = sy * x + y`.
    Shearing {
        /// horizontal factor
        x: f32,
        /// vertical factor
        y: f32,
    },
    /// Source corners mapped onto the inset canvas, ordered TL, TR, BL, BR.
    Perspective {
        /// `[x, y]` per corner
        corners: [[f32; 2]; 4],
    },
    /// Sinusoidal displacement with the given amplitudes in pixels.
    ElasticDistortion {
        /// horizontal amplitude
        x: f32,
        /// vertical amplitude
        y: f32,
    },
}

impl Transformation {
    /// The selector entry of this transformation.
    pub fn kind(&self) -> TransformKind {
        match self {
            Transformation::Original => TransformKind::Original,
            Transformation::Translation { .. } => TransformKind::Translation,
            Transformation::Rotation { .. } => TransformKind::Rotation,
            Transformation::Scaling { .. } => TransformKind::Scaling,
            Transformation::Shearing { .. } => TransformKind::Shearing,
            Transformation::Perspective { .. } => TransformKind::Perspective,
            Transformation::ElasticDistortion { .. } => TransformKind::ElasticDistortion,
        }
    }

    /// Builds a transformation from values ordered like [`TransformKind::params`].
    pub fn from_values(kind: TransformKind, values: &[f32]) -> Result<Self, AppError> {
        let expected = kind.params(None).len();
        if values.len() != expected {
            return Err(AppError::invalid(
                kind.slug(),
                format!("expected {expected} values, got {}", values.len()),
            ));
        }

        let t = match kind {
            TransformKind::Original => Transformation::Original,
            TransformKind::Translation => Transformation::Translation {
                x: values[0],
                y: values[1],
            },
            TransformKind::Rotation => Transformation::Rotation { angle: values[0] },
            TransformKind::Scaling => Transformation::Scaling {
                x: values[0],
                y: values[1],
            },
            TransformKind::Shearing => Transformation::Shearing {
                x: values[0],
                y: values[1],
            },
            TransformKind::Perspective => Transformation::Perspective {
                corners: [
                    [values[0], values[1]],
                    [values[2], values[3]],
                    [values[4], values[5]],
                    [values[6], values[7]],
                ],
            },
            TransformKind::ElasticDistortion => Transformation::ElasticDistortion {
                x: values[0],
                y: values[1],
            },
        };
        Ok(t)
    }

    /// The parameters ordered like [`TransformKind::params`].
    pub fn values(&self) -> Vec<f32> {
        match *self {
            Transformation::Original => vec![],
            Transformation::Rotation { angle } => vec![angle],
            Transformation::Translation { x, y }
            | Transformation::Scaling { x, y }
            | Transformation::Shearing { x, y }
            | Transformation::ElasticDistortion { x, y } => vec![x, y],
            Transformation::Perspective { corners } => corners.iter().flatten().copied().collect(),
        }
    }

    /// The default parameters of `kind` for an image of `size`.
    pub fn default_for(kind: TransformKind, size: ImageSize) -> Self {
        let values = kind
            .params(Some(size))
            .iter()
            .map(|p| p.default)
            .collect::<Vec<_>>();
        Self::from_kind_values(kind, &values)
    }

    /// Clamps every parameter into its range for an image of `size`.
    pub fn clamped(self, size: ImageSize) -> Self {
        let kind = self.kind();
        let values = kind
            .params(Some(size))
            .iter()
            .zip(self.values())
            .map(|(p, v)| p.clamp(v))
            .collect::<Vec<_>>();
        Self::from_kind_values(kind, &values)
    }

    // values always come from `kind.params`, so the length matches
    fn from_kind_values(kind: TransformKind, values: &[f32]) -> Self {
        Self::from_values(kind, values).unwrap_or(Transformation::Original)
    }

    /// A short human readable summary, e.g. `Rotation (rotation_angle=30)`.
    pub fn describe(&self) -> String {
        let kind = self.kind();
        let fields = kind
            .params(None)
            .iter()
            .zip(self.values())
            .map(|(p, v)| format!("{}={}", p.name, v))
            .collect::<Vec<_>>();
        if fields.is_empty() {
            kind.label().to_string()
        } else {
            format!("{} ({})", kind.label(), fields.join(", "))
        }
    }

    /// Applies the transformation. The output has the size of the input and
    /// `Original` returns a copy of the input.
    ///
    /// # Arguments
    ///
    /// * `image` - The decoded rgb8 image.
    /// * `interpolation` - The resampling kernel for the warps.
    pub fn apply(
        &self,
        image: &Image<u8, 3>,
        interpolation: InterpolationMode,
    ) -> Result<Image<u8, 3>, AppError> {
        let size = image.size();
        let (cx, cy) = (size.width as f32 / 2.0, size.height as f32 / 2.0);

        let src = image.cast::<f32>()?;
        let mut dst = Image::<f32, 3>::from_size_val(size, 0.0)?;

        match *self {
            // u8 -> f32 -> u8 is exact, so the input comes back unchanged
            Transformation::Original => dst = src,
            Transformation::Translation { x, y } => warp::warp_affine(
                &src,
                &mut dst,
                &warp::get_translation_matrix2d(x, y),
                interpolation,
            )?,
            Transformation::Rotation { angle } => warp::warp_affine(
                &src,
                &mut dst,
                &warp::get_rotation_matrix2d((cx, cy), angle, 1.0),
                interpolation,
            )?,
            Transformation::Scaling { x, y } => warp::warp_affine(
                &src,
                &mut dst,
                &warp::get_scaling_matrix2d(x, y),
                interpolation,
            )?,
            Transformation::Shearing { x, y } => warp::warp_affine(
                &src,
                &mut dst,
                &warp::get_shear_matrix2d(x, y),
                interpolation,
            )?,
            Transformation::Perspective { corners } => {
                let m = warp::get_perspective_transform(&corners, &destination_corners(size))
                    .map_err(|err| match err {
                        ImageError::CannotComputeDeterminant => AppError::invalid(
                            "perspective",
                            "the corners do not span a quadrilateral",
                        ),
                        err => err.into(),
                    })?;
                warp::warp_perspective(&src, &mut dst, &m, interpolation)?
            }
            Transformation::ElasticDistortion { x, y } => {
                warp::warp_elastic(&src, &mut dst, x, y, interpolation)?
            }
        }

        let mut out = Image::<u8, 3>::from_size_val(size, 0)?;
        ops::convert_from_f32(&dst, &mut out)?;
        Ok(out)
    }
}

/// The perspective destination quad: the canvas inset by [`PERSPECTIVE_INSET`].
pub fn destination_corners(size: ImageSize) -> [[f32; 2]; 4] {
    let (w, h) = (size.width as f32, size.height as f32);
    let d = PERSPECTIVE_INSET;
    [[d, d], [w - d, d], [d, h - d], [w - d, h - d]]
}
