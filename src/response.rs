use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::{AppError, ErrorDetail};

pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

/// A bare JSON body with an explicit status.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub status: StatusCode,
    pub body: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(body: T) -> ApiResult<T> {
        Self::with_status(StatusCode::OK, body)
    }

    pub fn with_status(status: StatusCode, body: T) -> ApiResult<T> {
        Ok(Self { status, body })
    }
}

#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err: Option<ErrorDetail>,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            err: None,
        }
    }

    pub(crate) fn from_error(err: &AppError) -> Self {
        Self {
            message: err.message().to_string(),
            err: err.detail().cloned(),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), Json(MessageBody::from_error(&self))).into_response()
    }
}

pub(crate) fn log_app_error(err: &AppError, status: StatusCode) {
    match err.detail() {
        Some(detail) => tracing::error!(
            status = status.as_u16(),
            kind = ?detail.name,
            cause = %detail.message,
            "{}",
            err.message()
        ),
        None => tracing::error!(status = status.as_u16(), "{}", err.message()),
    }
}
