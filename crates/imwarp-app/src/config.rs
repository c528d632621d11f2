use std::path::PathBuf;

use argh::FromArgs;

use imwarp::imgproc::interpolation::InterpolationMode;

use crate::transform::TransformKind;

#[derive(FromArgs, Debug, Clone, PartialEq)]
/// Serve the image transformation page over HTTP
pub struct ServeArgs {
    /// address to bind to
    #[argh(option, default = "String::from(\"0.0.0.0\")")]
    pub host: String,

    /// HTTP port to listen on
    #[argh(option, default = "3000")]
    pub port: u16,

    /// largest accepted request body in megabytes
    #[argh(option, default = "16")]
    pub max_upload_mb: usize,

    /// resampling kernel: bilinear or nearest
    #[argh(option, default = "InterpolationMode::Bilinear")]
    pub interpolation: InterpolationMode,
}

impl Default for ServeArgs {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 3000,
            max_upload_mb: 16,
            interpolation: InterpolationMode::Bilinear,
        }
    }
}

impl ServeArgs {
    /// The `host:port` pair to listen on.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The body limit in bytes.
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

#[derive(FromArgs, Debug)]
/// Apply one geometric transformation to an image file
pub struct CliArgs {
    /// path to an input JPEG or PNG image
    #[argh(option, short = 'i')]
    pub input: PathBuf,

    /// path of the output image, .png, .jpg or .jpeg
    #[argh(option, short = 'o')]
    pub output: PathBuf,

    /// original, translation, rotation, scaling, shearing, perspective or elastic
    #[argh(option, short = 't', default = "TransformKind::Original")]
    pub transformation: TransformKind,

    /// horizontal translation in pixels
    #[argh(option)]
    pub translation_x: Option<f32>,

    /// vertical translation in pixels
    #[argh(option)]
    pub translation_y: Option<f32>,

    /// rotation angle in degrees
    #[argh(option)]
    pub angle: Option<f32>,

    /// horizontal scaling factor
    #[argh(option)]
    pub scaling_x: Option<f32>,

    /// vertical scaling factor
    #[argh(option)]
    pub scaling_y: Option<f32>,

    /// horizontal shearing factor
    #[argh(option)]
    pub shearing_x: Option<f32>,

    /// vertical shearing factor
    #[argh(option)]
    pub shearing_y: Option<f32>,

    /// perspective top-left corner x
    #[argh(option)]
    pub top_left_x: Option<f32>,

    /// perspective top-left corner y
    #[argh(option)]
    pub top_left_y: Option<f32>,

    /// perspective top-right corner x
    #[argh(option)]
    pub top_right_x: Option<f32>,

    /// perspective top-right corner y
    #[argh(option)]
    pub top_right_y: Option<f32>,

    /// perspective bottom-left corner x
    #[argh(option)]
    pub bottom_left_x: Option<f32>,

    /// perspective bottom-left corner y
    #[argh(option)]
    pub bottom_left_y: Option<f32>,

    /// perspective bottom-right corner x
    #[argh(option)]
    pub bottom_right_x: Option<f32>,

    /// perspective bottom-right corner y
    #[argh(option)]
    pub bottom_right_y: Option<f32>,

    /// elastic displacement amplitude along x in pixels
    #[argh(option)]
    pub x_displacement: Option<f32>,

    /// elastic displacement amplitude along y in pixels
    #[argh(option)]
    pub y_displacement: Option<f32>,

    /// resampling kernel: bilinear or nearest
    #[argh(option, default = "InterpolationMode::Bilinear")]
    pub interpolation: InterpolationMode,

    /// JPEG quality from 0 to 100
    #[argh(option, default = "95")]
    pub quality: u8,
}

impl CliArgs {
    /// The value given for the form field `name`, if any.
    pub fn value(&self, name: &str) -> Option<f32> {
        match name {
            "translation_x" => self.translation_x,
            "translation_y" => self.translation_y,
            "rotation_angle" => self.angle,
            "scaling_x" => self.scaling_x,
            "scaling_y" => self.scaling_y,
            "shearing_x" => self.shearing_x,
            "shearing_y" => self.shearing_y,
            "top_left_x" => self.top_left_x,
            "top_left_y" => self.top_left_y,
            "top_right_x" => self.top_right_x,
            "top_right_y" => self.top_right_y,
            "bottom_left_x" => self.bottom_left_x,
            "bottom_left_y" => self.bottom_left_y,
            "bottom_right_x" => self.bottom_right_x,
            "bottom_right_y" => self.bottom_right_y,
            "x_displacement" => self.x_displacement,
            "y_displacement" => self.y_displacement,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_defaults() -> Result<(), String> {
        let args = ServeArgs::from_args(&["imwarp-serve"], &[]).map_err(|e| e.output)?;
        assert_eq!(args, ServeArgs::default());
        assert_eq!(args.addr(), "0.0.0.0:3000");
        assert_eq!(args.max_upload_bytes(), 16 * 1024 * 1024);
        Ok(())
    }

    #[test]
    fn serve_options() -> Result<(), String> {
        let args = ServeArgs::from_args(
            &["imwarp-serve"],
            &["--host", "127.0.0.1", "--port", "8080", "--interpolation", "nearest"],
        )
        .map_err(|e| e.output)?;
        assert_eq!(args.addr(), "127.0.0.1:8080");
        assert_eq!(args.interpolation, InterpolationMode::Nearest);
        Ok(())
    }

    #[test]
    fn cli_options() -> Result<(), String> {
        let args = CliArgs::from_args(
            &["imwarp-cli"],
            &["-i", "in.jpg", "-o", "out.png", "-t", "rotation", "--angle", "45"],
        )
        .map_err(|e| e.output)?;
        assert_eq!(args.transformation, TransformKind::Rotation);
        assert_eq!(args.value("rotation_angle"), Some(45.0));
        assert_eq!(args.value("translation_x"), None);
        assert_eq!(args.quality, 95);
        Ok(())
    }

    #[test]
    fn cli_rejects_unknown_transformation() {
        let res = CliArgs::from_args(&["imwarp-cli"], &["-i", "a", "-o", "b", "-t", "swirl"]);
        assert!(res.is_err());
    }
}
