use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// HTTP-facing error. Every variant renders the same envelope:
/// `{"success": false, "error": <code>, "message": <human readable>}`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{code}: {message}")]
    BadRequest { code: String, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    #[error("{code}: {message}")]
    TooManyRequests {
        code: String,
        message: String,
        retry_after: Option<u64>,
    },

    #[error("{code}: {message}")]
    ServerError { code: String, message: String },

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl AppError {
    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::BadRequest {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn too_many_requests(code: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::TooManyRequests {
            code: code.into(),
            message: message.into(),
            retry_after: None,
        }
    }

    /// Attach a `Retry-After` hint; no effect on variants other than `TooManyRequests`.
    pub fn with_retry_after(mut self, seconds: Option<u64>) -> Self {
        if let AppError::TooManyRequests { retry_after, .. } = &mut self {
            *retry_after = seconds;
        }
        self
    }

    pub fn server_error(code: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::ServerError {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            AppError::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::ServerError { .. }
            | AppError::InternalError(_)
            | AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let (error, message, retry_after) = match self {
            AppError::BadRequest { code, message } | AppError::ServerError { code, message } => {
                (code, message, None)
            }
            AppError::NotFound(message) => ("Not found".to_string(), message, None),
            AppError::MethodNotAllowed(message) => {
                ("Method not allowed".to_string(), message, None)
            }
            AppError::TooManyRequests {
                code,
                message,
                retry_after,
            } => (code, message, retry_after),
            AppError::InternalError(err) => {
                tracing::error!(error = ?err, "Unhandled internal error");
                (
                    "Internal server error".to_string(),
                    "An unexpected error occurred.".to_string(),
                    None,
                )
            }
            AppError::ConfigError(err) => {
                tracing::error!(error = %err, "Configuration error");
                (
                    "Configuration error".to_string(),
                    "The service is misconfigured.".to_string(),
                    None,
                )
            }
        };

        let mut res = (
            status,
            Json(ErrorResponse {
                success: false,
                error,
                message,
            }),
        )
            .into_response();

        if let Some(retry) = retry_after {
            res.headers_mut()
                .insert(axum::http::header::RETRY_AFTER, retry.into());
        }

        res
    }
}
