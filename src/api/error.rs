use crate::services::preview::PreviewError;
use crate::utils::validation::ValidationError;
use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("No file uploaded")]
    MissingFile,

    #[error("No selected file")]
    EmptyFilename,

    #[error("File type not allowed: '.{extension}'. Allowed types: {allowed}")]
    UnsupportedType { extension: String, allowed: String },

    #[error("File type not allowed: no file extension. Allowed types: {allowed}")]
    MissingExtension { allowed: String },

    #[error("Invalid form data: {}", .0.body_text())]
    Multipart(#[from] MultipartError),

    #[error("Error processing file: {0}")]
    Preview(#[from] PreviewError),

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::EmptyFilename => AppError::EmptyFilename,
            ValidationError::UnsupportedType { extension, allowed } => {
                AppError::UnsupportedType { extension, allowed }
            }
            ValidationError::MissingExtension { allowed } => AppError::MissingExtension { allowed },
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingFile
            | AppError::EmptyFilename
            | AppError::UnsupportedType { .. }
            | AppError::MissingExtension { .. } => StatusCode::BAD_REQUEST,
            AppError::Multipart(e) => e.status(),
            AppError::Preview(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Logs the failure and returns the status and message shown to the caller.
    fn into_parts(self) -> (StatusCode, String) {
        let status = self.status();
        let message = match &self {
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal Server Error".to_string()
            }
            AppError::Preview(e) => {
                tracing::warn!("Spreadsheet rejected: {}", e);
                self.to_string()
            }
            _ => {
                tracing::info!("Upload rejected ({}): {}", status, self);
                self.to_string()
            }
        };
        (status, message)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.into_parts().into_response()
    }
}

/// [`AppError`] rendered as a JSON body, for the API routes
#[derive(Debug)]
pub struct JsonError(pub AppError);

impl From<AppError> for JsonError {
    fn from(err: AppError) -> Self {
        JsonError(err)
    }
}

impl IntoResponse for JsonError {
    fn into_response(self) -> Response {
        let (status, message) = self.0.into_parts();

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
