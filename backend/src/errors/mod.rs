//! Global application error types and handlers.
//!
//! Every failure leaves the service in the same envelope:
//! `{"success": false, "error": <status>, "message": <description>}`, sent
//! with the matching HTTP status. Authorization failures add a `code` field
//! carrying the machine-readable error code.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::auth::AuthError;
use crate::database::StoreError;

#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub success: bool,
    pub error: u16,
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'a str>,
}

pub fn error_response(status: StatusCode, message: &str) -> Response {
    render(status, message, None)
}

pub fn coded_error_response(status: StatusCode, code: &str, message: &str) -> Response {
    render(status, message, Some(code))
}

fn render(status: StatusCode, message: &str, code: Option<&str>) -> Response {
    let body = ErrorBody {
        success: false,
        error: status.as_u16(),
        message,
        code,
    };
    (status, Json(body)).into_response()
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request")]
    BadRequest,

    #[error("resource not found")]
    NotFound,

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("{0}")]
    Unprocessable(String),

    #[error("internal server error")]
    Internal,

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Auth(err) => err.status(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Auth(err) => err.into_response(),
            ApiError::Internal => {
                error!("request failed with an internal error");
                error_response(self.status(), &self.to_string())
            }
            _ => error_response(self.status(), &self.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::NotFound,
            StoreError::DuplicateTitle(_) => ApiError::Unprocessable(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection.status() {
            StatusCode::UNPROCESSABLE_ENTITY => ApiError::Unprocessable(rejection.body_text()),
            _ => ApiError::BadRequest,
        }
    }
}

// Non-numeric ids never match a drink.
impl From<PathRejection> for ApiError {
    fn from(_: PathRejection) -> Self {
        ApiError::NotFound
    }
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
