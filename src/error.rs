use axum::http::StatusCode;
use serde::Serialize;

/// Category reported in the `err.name` field of failure bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    #[serde(rename = "ValidationError")]
    Validation,
    #[serde(rename = "CastError")]
    Cast,
    #[serde(rename = "DatabaseError")]
    Database,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetail {
    pub name: ErrorKind,
    pub message: String,
}

impl ErrorDetail {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            name: ErrorKind::Validation,
            message: message.into(),
        }
    }

    pub fn cast(message: impl Into<String>) -> Self {
        Self {
            name: ErrorKind::Cast,
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self {
            name: ErrorKind::Database,
            message: message.into(),
        }
    }
}

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    /// A todo operation that could not complete. Carries the per-operation
    /// message and the underlying cause.
    Failed {
        status: StatusCode,
        message: String,
        err: ErrorDetail,
    },
    Internal(String),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn failed(message: impl Into<String>, err: ErrorDetail) -> Self {
        Self::Failed {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
            err,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Overrides the status of a failed operation. Other variants keep theirs.
    pub fn with_failure_status(self, status: StatusCode) -> Self {
        match self {
            Self::Failed { message, err, .. } => Self::Failed {
                status,
                message,
                err,
            },
            other => other,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Failed { status, .. } => *status,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(message)
            | Self::NotFound(message)
            | Self::Failed { message, .. }
            | Self::Internal(message) => message.as_str(),
        }
    }

    pub fn detail(&self) -> Option<&ErrorDetail> {
        match self {
            Self::Failed { err, .. } => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.detail() {
            Some(detail) => write!(f, "{}: {}", self.message(), detail.message),
            None => write!(f, "{}", self.message()),
        }
    }
}

impl std::error::Error for AppError {}
