/// Defines how samples outside of the source image are resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BorderMode {
    /// Fill with a constant value: `iiiiii|abcdefgh|iiiiiii`.
    Constant(f32),
    /// Repeat the edge pixel: `aaaaaa|abcdefgh|hhhhhhh`.
    Replicate,
    /// Mirror around the edge, repeating the edge pixel: `fedcba|abcdefgh|hgfedcb`.
    Reflect,
}

impl Default for BorderMode {
    fn default() -> Self {
        BorderMode::Constant(0.0)
    }
}

impl BorderMode {
    /// The value used for taps that cannot be mapped into the image.
    pub(crate) fn fill_value(&self) -> f32 {
        match self {
            BorderMode::Constant(value) => *value,
            BorderMode::Replicate | BorderMode::Reflect => 0.0,
        }
    }

    /// Map a possibly out-of-range index into `[0, len)`.
    ///
    /// Returns `None` when the tap must take the constant fill value.
    pub(crate) fn map_index(&self, p: isize, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }

        if p >= 0 && (p as usize) < len {
            return Some(p as usize);
        }

        match self {
            BorderMode::Constant(_) => None,
            BorderMode::Replicate => Some(p.clamp(0, len as isize - 1) as usize),
            BorderMode::Reflect => {
                let len = len as isize;
                let period = 2 * len;
                let p = p.rem_euclid(period);
                Some(if p < len { p } else { period - 1 - p } as usize)
            }
        }
    }
}
