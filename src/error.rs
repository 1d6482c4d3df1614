use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Failures surfaced by the service layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// JSON body returned for every failed request.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    error: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            error: None,
        }
    }

    /// Maps a service failure onto a response. Missing entities become 404,
    /// validation failures 400, and anything else `fallback`.
    pub fn from_service(err: ServiceError, message: &str, fallback: StatusCode) -> Self {
        match err {
            ServiceError::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, msg),
            ServiceError::Validation(detail) => Self {
                status: StatusCode::BAD_REQUEST,
                message: message.to_string(),
                error: Some(detail),
            },
            ServiceError::Storage(e) => Self {
                status: fallback,
                message: message.to_string(),
                error: Some(format!("{:#}", e)),
            },
        }
    }

    /// `map_err` adapter reporting unexpected failures as 400.
    pub fn context(message: &'static str) -> impl FnOnce(ServiceError) -> Self {
        move |err| Self::from_service(err, message, StatusCode::BAD_REQUEST)
    }

    /// `map_err` adapter reporting unexpected failures with `status`.
    pub fn context_with(
        message: &'static str,
        status: StatusCode,
    ) -> impl FnOnce(ServiceError) -> Self {
        move |err| Self::from_service(err, message, status)
    }

    pub fn from_rejection(rejection: JsonRejection, message: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.to_string(),
            error: Some(rejection.body_text()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.status {
            StatusCode::NOT_FOUND => tracing::info!("{}", self.message),
            s if s.is_server_error() => {
                tracing::error!(error = ?self.error, "{}", self.message)
            }
            _ => tracing::warn!(error = ?self.error, "{}", self.message),
        }

        let body = ErrorBody {
            message: self.message,
            error: self.error,
        };

        (self.status, Json(body)).into_response()
    }
}
