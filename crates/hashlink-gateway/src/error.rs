use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use hashlink_core::ShortenerError;
use thiserror::Error;
use tracing::error;

use crate::model::ErrorResponse;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Shortener(#[from] ShortenerError),
    #[error("{message}")]
    BadRequest { status: StatusCode, message: String },
    #[error("stored url cannot be used as a redirect target: {0}")]
    InvalidTarget(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Shortener(e) => match e {
                ShortenerError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
                ShortenerError::AlreadyShortened { .. } | ShortenerError::CodeCollision { .. } => {
                    StatusCode::CONFLICT
                }
                ShortenerError::NotFound(_) => StatusCode::NOT_FOUND,
                ShortenerError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::BadRequest { status, .. } => *status,
            AppError::InvalidTarget(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
