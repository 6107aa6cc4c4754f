//! HTTP surface
//!
//! Thin axum adapters over [`SuperheroService`](crate::service::SuperheroService).
//! Every failure is rendered as `{ "error": ..., "code": ... }`.

pub mod dto;
pub mod handlers;
pub mod router;
pub mod state;

use crate::core::RegistryError;
use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

pub use router::build_router;
pub use state::AppState;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug)]
pub enum WebError {
    Registry(RegistryError),
    Input(String),
}

impl From<RegistryError> for WebError {
    fn from(err: RegistryError) -> Self {
        WebError::Registry(err)
    }
}

impl From<MultipartError> for WebError {
    fn from(err: MultipartError) -> Self {
        WebError::Input(format!("Invalid multipart body: {}", err.body_text()))
    }
}

impl From<JsonRejection> for WebError {
    fn from(rejection: JsonRejection) -> Self {
        WebError::Input(format!("Invalid JSON body: {}", rejection.body_text()))
    }
}

impl From<MultipartRejection> for WebError {
    fn from(rejection: MultipartRejection) -> Self {
        WebError::Input(format!("Invalid multipart body: {}", rejection.body_text()))
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, message, code) = match self {
            WebError::Registry(RegistryError::Validation(msg)) | WebError::Input(msg) => {
                (StatusCode::BAD_REQUEST, msg, "validation_error")
            }
            WebError::Registry(RegistryError::NotFound(what)) => (
                StatusCode::NOT_FOUND,
                format!("{} not found", what),
                "not_found",
            ),
            WebError::Registry(err) => {
                error!(error = %err, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    "internal_error",
                )
            }
        };

        let body = Json(ErrorResponse {
            error: message,
            code: code.to_string(),
        });

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, WebError>;
