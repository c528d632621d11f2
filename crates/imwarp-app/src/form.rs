use std::collections::HashMap;

use axum::extract::Multipart;
use base64::Engine;

use imwarp::image::ImageSize;

use crate::{
    error::AppError,
    transform::{TransformKind, Transformation},
};

/// Field carrying the uploaded file.
pub const IMAGE_FIELD: &str = "image";
/// Field carrying the previously uploaded image, base64 encoded, so the
/// parameters can be tuned without uploading the file again.
pub const IMAGE_DATA_FIELD: &str = "image_data";
/// Field carrying the selected transformation.
pub const TRANSFORMATION_FIELD: &str = "transformation";

/// The submitted form: the raw image bytes, the selected kind and the
/// untouched text of every other field.
#[derive(Debug, Default)]
pub struct TransformForm {
    /// Encoded image bytes, if any were sent.
    pub image: Option<Vec<u8>>,
    /// The selected transformation.
    pub kind: TransformKind,
    /// The remaining fields by name.
    pub values: HashMap<String, String>,
}

impl TransformForm {
    /// Reads the form out of a multipart body.
    ///
    /// An empty file field, which browsers send when nothing was picked, counts
    /// as no image; the base64 field is used instead when present.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = TransformForm::default();
        let mut image_data = None;

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                IMAGE_FIELD => {
                    let bytes = field.bytes().await?;
                    if !bytes.is_empty() {
                        form.image = Some(bytes.to_vec());
                    }
                }
                IMAGE_DATA_FIELD => {
                    let text = field.text().await?;
                    if !text.trim().is_empty() {
                        image_data = Some(text);
                    }
                }
                TRANSFORMATION_FIELD => {
                    form.kind = field.text().await?.parse()?;
                }
                _ => {
                    let text = field.text().await?;
                    form.values.insert(name, text);
                }
            }
        }

        if form.image.is_none() {
            if let Some(text) = image_data {
                form.image = Some(decode_image_data(&text)?);
            }
        }

        log::debug!(
            "form: kind={}, image={} bytes, values={:?}",
            form.kind.slug(),
            form.image.as_ref().map_or(0, Vec::len),
            form.values
        );

        Ok(form)
    }

    /// Reads the value of the field `name`. Missing and blank fields are `None`.
    pub fn value(&self, name: &str) -> Result<Option<f32>, AppError> {
        let text = match self.values.get(name).map(|s| s.trim()) {
            None | Some("") => return Ok(None),
            Some(text) => text,
        };

        let value = text
            .parse::<f32>()
            .map_err(|err| AppError::invalid(name, format!("{text:?} is not a number ({err})")))?;
        if !value.is_finite() {
            return Err(AppError::invalid(name, format!("{text:?} is not finite")));
        }
        Ok(Some(value))
    }

    /// The selected transformation for an image of `size`, with missing
    /// fields set to their defaults and every value clamped into range.
    pub fn transformation(&self, size: ImageSize) -> Result<Transformation, AppError> {
        let values = self
            .kind
            .params(Some(size))
            .iter()
            .map(|p| Ok(self.value(p.name)?.unwrap_or(p.default)))
            .collect::<Result<Vec<_>, AppError>>()?;

        Ok(Transformation::from_values(self.kind, &values)?.clamped(size))
    }
}

/// Encodes image bytes for the hidden form field.
pub fn encode_image_data(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

fn decode_image_data(text: &str) -> Result<Vec<u8>, AppError> {
    base64::engine::general_purpose::STANDARD
        .decode(text.trim())
        .map_err(|err| AppError::invalid(IMAGE_DATA_FIELD, err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(kind: TransformKind, values: &[(&str, &str)]) -> TransformForm {
        TransformForm {
            image: None,
            kind,
            values: values
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn missing_fields_take_defaults() -> Result<(), AppError> {
        let f = form(TransformKind::Translation, &[("translation_x", " ")]);
        assert_eq!(
            f.transformation([640, 480].into())?,
            Transformation::Translation { x: 100.0, y: 50.0 }
        );
        Ok(())
    }

    #[test]
    fn values_are_parsed_and_clamped() -> Result<(), AppError> {
        let f = form(
            TransformKind::Scaling,
            &[("scaling_x", "1.5"), ("scaling_y", "9"), ("rotation_angle", "3")],
        );
        assert_eq!(
            f.transformation([10, 10].into())?,
            Transformation::Scaling { x: 1.5, y: 2.0 }
        );
        Ok(())
    }

    #[test]
    fn corners_are_read_in_order() -> Result<(), AppError> {
        let f = form(
            TransformKind::Perspective,
            &[
                ("top_left_x", "1"),
                ("top_left_y", "2"),
                ("top_right_x", "30"),
                ("top_right_y", "3"),
                ("bottom_left_x", "4"),
                ("bottom_left_y", "40"),
                ("bottom_right_x", "300"),
                ("bottom_right_y", "41"),
            ],
        );
        assert_eq!(
            f.transformation([50, 50].into())?,
            Transformation::Perspective {
                corners: [[1.0, 2.0], [30.0, 3.0], [4.0, 40.0], [49.0, 41.0]]
            }
        );
        Ok(())
    }

    #[test]
    fn garbage_numbers_are_rejected() {
        let f = form(TransformKind::Rotation, &[("rotation_angle", "thirty")]);
        let res = f.transformation([10, 10].into());
        assert!(matches!(
            res,
            Err(AppError::InvalidParameter { ref name, .. }) if name == "rotation_angle"
        ));

        let f = form(TransformKind::Rotation, &[("rotation_angle", "inf")]);
        assert!(f.transformation([10, 10].into()).is_err());
    }

    #[test]
    fn image_data_roundtrip() -> Result<(), AppError> {
        let bytes = vec![0x89, b'P', b'N', b'G', 0, 255];
        assert_eq!(decode_image_data(&encode_image_data(&bytes))?, bytes);
        assert!(decode_image_data("%%%").is_err());
        Ok(())
    }
}
