use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

use crate::api::models::{DetailResponse, ErrorResponse};
use crate::domain::ValidationError;

/// Failure of a request handler, rendered as a JSON payload.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Entity absent; reported in the body with a 200 status.
    #[error("{0}")]
    NotFound(String),

    /// Entity absent; reported with a 404 status.
    #[error("{0}")]
    Missing(String),

    #[error("Invalid credentials")]
    Unauthorized,

    #[error("{0}")]
    Invalid(String),

    #[error("{message}")]
    Internal {
        message: &'static str,
        cause: anyhow::Error,
    },
}

impl ApiError {
    /// Wraps a storage failure; only `message` reaches the caller.
    pub fn internal(message: &'static str) -> impl FnOnce(anyhow::Error) -> ApiError {
        move |cause| ApiError::Internal { message, cause }
    }
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        ApiError::Invalid(error.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Invalid(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Invalid(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(error) => (StatusCode::OK, Json(ErrorResponse { error })).into_response(),
            ApiError::Missing(detail) => {
                (StatusCode::NOT_FOUND, Json(DetailResponse { detail })).into_response()
            }
            ApiError::Unauthorized => {
                let detail = ApiError::Unauthorized.to_string();
                (StatusCode::UNAUTHORIZED, Json(DetailResponse { detail })).into_response()
            }
            ApiError::Invalid(error) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(ErrorResponse { error })).into_response()
            }
            ApiError::Internal { message, cause } => {
                log::error!("{}: {:?}", message, cause);
                let error = message.to_string();
                (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse { error })).into_response()
            }
        }
    }
}
