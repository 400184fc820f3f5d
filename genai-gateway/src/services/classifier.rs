//! Maps generation failures to an HTTP error.
//!
//! Matching is on the lower-cased error text, first rule wins. This mirrors
//! how OpenAI reports error codes inside the response body and is tied to
//! that wording; replace with typed matching if the upstream ever exposes
//! structured error codes to this layer.

use axum::http::StatusCode;
use service_core::error::AppError;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    ContentPolicy,
    RateLimit,
    QuotaExceeded,
    Internal,
}

/// What was being generated; only changes the wording of generic failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Image,
    Text,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Image => "image",
            Operation::Text => "text",
        }
    }
}

/// Ordered (needle, category) rules.
const RULES: &[(&str, ErrorCategory)] = &[
    ("content_policy_violation", ErrorCategory::ContentPolicy),
    ("rate_limit", ErrorCategory::RateLimit),
    ("insufficient_quota", ErrorCategory::QuotaExceeded),
];

pub fn classify(err: &impl Display) -> ErrorCategory {
    let text = err.to_string().to_lowercase();
    RULES
        .iter()
        .find(|(needle, _)| text.contains(needle))
        .map(|(_, category)| *category)
        .unwrap_or(ErrorCategory::Internal)
}

impl ErrorCategory {
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCategory::ContentPolicy => "Content policy violation",
            ErrorCategory::RateLimit => "Rate limit exceeded",
            ErrorCategory::QuotaExceeded => "Quota exceeded",
            ErrorCategory::Internal => "Internal server error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCategory::ContentPolicy => StatusCode::BAD_REQUEST,
            ErrorCategory::RateLimit | ErrorCategory::QuotaExceeded => {
                StatusCode::TOO_MANY_REQUESTS
            }
            ErrorCategory::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self, operation: Operation) -> String {
        match self {
            ErrorCategory::ContentPolicy => {
                "The prompt violates OpenAI's content policy. Please try a different description."
                    .to_string()
            }
            ErrorCategory::RateLimit => "Too many requests. Please try again later.".to_string(),
            ErrorCategory::QuotaExceeded => "OpenAI API quota has been exceeded.".to_string(),
            ErrorCategory::Internal => format!(
                "An unexpected error occurred while generating the {}.",
                operation.as_str()
            ),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ErrorCategory::ContentPolicy => "content_policy",
            ErrorCategory::RateLimit => "rate_limited",
            ErrorCategory::QuotaExceeded => "quota_exceeded",
            ErrorCategory::Internal => "error",
        }
    }

    pub fn into_app_error(self, operation: Operation) -> AppError {
        let message = self.message(operation);
        match self {
            ErrorCategory::ContentPolicy => AppError::bad_request(self.code(), message),
            ErrorCategory::RateLimit | ErrorCategory::QuotaExceeded => {
                AppError::too_many_requests(self.code(), message)
            }
            ErrorCategory::Internal => AppError::server_error(self.code(), message),
        }
    }
}
