use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use imwarp::{image::ImageError, io::IoError};

/// An error type for the app.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// The request did not carry an image.
    #[error("Please upload an image.")]
    NoImage,

    /// Error to decode or encode an image.
    #[error("Failed to process the image file. {0}")]
    Io(#[from] IoError),

    /// Error raised by an image operation.
    #[error("Failed to transform the image. {0}")]
    Image(#[from] ImageError),

    /// Error to read the multipart form.
    #[error("Failed to read the form. {0}")]
    Multipart(#[from] MultipartError),

    /// The transformation name is not in the catalog.
    #[error("Unknown transformation: {0}")]
    UnknownTransformation(String),

    /// A form value could not be used.
    #[error("Invalid value for {name}: {reason}")]
    InvalidParameter {
        /// The form field.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The blocking worker did not finish.
    #[error("Transformation task failed. {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl AppError {
    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        AppError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    /// The HTTP status reported for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NoImage
            | AppError::UnknownTransformation(_)
            | AppError::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
            AppError::Multipart(err) => err.status(),
            // anything that fails while decoding an upload is the client's input
            AppError::Io(IoError::FileError(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Io(_) => StatusCode::BAD_REQUEST,
            AppError::Image(_) | AppError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("{self}");
        } else {
            log::warn!("Rejected request: {self}");
        }

        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
