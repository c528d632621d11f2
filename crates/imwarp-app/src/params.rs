use serde::Serialize;

use imwarp::image::ImageSize;

/// A numeric form field with its bounds, default value and widget step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ParamRange {
    /// The form field name.
    pub name: &'static str,
    /// The label shown next to the input.
    pub label: &'static str,
    /// The smallest accepted value.
    pub min: f32,
    /// The largest accepted value. Unbounded ranges serialize as `null`.
    pub max: f32,
    /// The value used when the field is left empty.
    pub default: f32,
    /// The widget increment.
    pub step: f32,
}

impl ParamRange {
    const fn new(
        name: &'static str,
        label: &'static str,
        min: f32,
        max: f32,
        default: f32,
        step: f32,
    ) -> Self {
        Self {
            name,
            label,
            min,
            max,
            default,
            step,
        }
    }

    /// Clamp `value` into the range. NaN falls back to the default.
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.default.clamp(self.min, self.max);
        }
        value.clamp(self.min, self.max)
    }

    /// Whether the range has a finite upper bound.
    pub fn is_bounded(&self) -> bool {
        self.max.is_finite()
    }
}

pub const TRANSLATION_X: ParamRange =
    ParamRange::new("translation_x", "X Translation (pixels)", -500.0, 500.0, 100.0, 1.0);
pub const TRANSLATION_Y: ParamRange =
    ParamRange::new("translation_y", "Y Translation (pixels)", -500.0, 500.0, 50.0, 1.0);

pub const ROTATION_ANGLE: ParamRange =
    ParamRange::new("rotation_angle", "Rotation Angle (degrees)", -180.0, 180.0, 30.0, 1.0);

pub const SCALING_X: ParamRange =
    ParamRange::new("scaling_x", "X Scaling Factor", 0.1, 2.0, 1.2, 0.1);
pub const SCALING_Y: ParamRange =
    ParamRange::new("scaling_y", "Y Scaling Factor", 0.1, 2.0, 0.8, 0.1);

pub const SHEARING_X: ParamRange =
    ParamRange::new("shearing_x", "X Shearing Factor", -1.0, 1.0, 0.2, 0.1);
pub const SHEARING_Y: ParamRange =
    ParamRange::new("shearing_y", "Y Shearing Factor", -1.0, 1.0, 0.2, 0.1);

pub const X_DISPLACEMENT: ParamRange =
    ParamRange::new("x_displacement", "X Displacement (pixels)", -10.0, 10.0, 0.0, 1.0);
pub const Y_DISPLACEMENT: ParamRange =
    ParamRange::new("y_displacement", "Y Displacement (pixels)", -10.0, 10.0, 0.0, 1.0);

// largest default corner coordinate
const CORNER_EXTENT: f32 = 200.0;

// (name, label, default) in corner order TL, TR, BL, BR with x before y
const CORNER_FIELDS: [(&str, &str, f32); 8] = [
    ("top_left_x", "Top-left X", 50.0),
    ("top_left_y", "Top-left Y", 50.0),
    ("top_right_x", "Top-right X", 200.0),
    ("top_right_y", "Top-right Y", 50.0),
    ("bottom_left_x", "Bottom-left X", 50.0),
    ("bottom_left_y", "Bottom-left Y", 200.0),
    ("bottom_right_x", "Bottom-right X", 200.0),
    ("bottom_right_y", "Bottom-right Y", 200.0),
];

/// The eight perspective corner fields.
///
/// Each coordinate is bounded by the pixel extent of the image, so x lies in
/// `[0, width - 1]` and y in `[0, height - 1]`. On an axis shorter than the
/// default quad the defaults are scaled down with it, so the default corners
/// stay apart. Without a size the upper bound is infinite and the defaults are
/// left as they are.
pub fn corner_ranges(size: Option<ImageSize>) -> [ParamRange; 8] {
    CORNER_FIELDS.map(|(name, label, default)| {
        let extent = size.map(|s| if name.ends_with("_x") { s.width } else { s.height });
        let max = match extent {
            Some(extent) => extent.saturating_sub(1) as f32,
            None => f32::INFINITY,
        };
        let default = if max < CORNER_EXTENT {
            (default * max / CORNER_EXTENT).round()
        } else {
            default
        };
        ParamRange::new(name, label, 0.0, max, default, 1.0)
    })
}
