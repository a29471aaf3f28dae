// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::backtrace::Backtrace;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 405 Method Not Allowed
    MethodNotAllowed(String),

    // 410 Gone (reserved for soft-deleted resources)
    Gone(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

/// Wire shape of every non-2xx response.
#[derive(Debug, Serialize)]
pub struct ErrorReport {
    pub error: String,
    pub info: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Gone(_) => StatusCode::GONE,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::MethodNotAllowed(msg)
            | ApiError::Gone(msg)
            | ApiError::InternalServerError(msg)
            | ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    pub fn report(&self, with_trace: bool) -> ErrorReport {
        ErrorReport::new(self.message(), with_trace)
    }
}

impl ErrorReport {
    /// `info` repeats the message and, when `with_trace` is set, appends the
    /// call stack captured here. Nothing is captured otherwise.
    pub fn new(message: impl Into<String>, with_trace: bool) -> Self {
        let error = message.into();
        let info = if with_trace {
            format!("{}\n{}", error, Backtrace::force_capture())
        } else {
            error.clone()
        };
        ErrorReport { error, info }
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        ApiError::MethodNotAllowed(message.into())
    }

    pub fn gone(message: impl Into<String>) -> Self {
        ApiError::Gone(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

impl From<crate::database::StoreError> for ApiError {
    fn from(err: crate::database::StoreError) -> Self {
        use crate::database::StoreError;
        match err {
            StoreError::NotFound(msg) => ApiError::not_found(msg),
            StoreError::Duplicate(msg) => ApiError::bad_request(msg),
            StoreError::VersionConflict(slug) => {
                tracing::error!("Unresolved write conflict on channel '{}'", slug);
                ApiError::internal_server_error("Cannot update channel info in database")
            }
            StoreError::Sqlx(sqlx_err) => {
                // Log the real error but return generic message
                tracing::error!("SQLx error: {}", sqlx_err);
                ApiError::internal_server_error("Database error occurred")
            }
        }
    }
}

impl From<crate::services::ChannelError> for ApiError {
    fn from(err: crate::services::ChannelError) -> Self {
        use crate::services::ChannelError;
        match err {
            ChannelError::EmptyField(_) | ChannelError::DuplicateChannel(_) => {
                ApiError::bad_request(err.to_string())
            }
            ChannelError::ChannelNotFound(_) | ChannelError::ItemNotFound { .. } => {
                ApiError::not_found(err.to_string())
            }
            ChannelError::UploadForbidden { .. } => ApiError::forbidden(err.to_string()),
            ChannelError::WriteContention { ref slug, attempts } => {
                tracing::error!(
                    "Gave up appending to channel '{}' after {} conflicting attempts",
                    slug,
                    attempts
                );
                ApiError::internal_server_error("Cannot update channel info in database")
            }
            ChannelError::Store(store_err) => store_err.into(),
        }
    }
}

impl From<crate::auth::CredentialError> for ApiError {
    fn from(err: crate::auth::CredentialError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

impl From<axum::extract::rejection::FormRejection> for ApiError {
    fn from(rejection: axum::extract::rejection::FormRejection) -> Self {
        ApiError::bad_request(format!("Invalid form body: {}", rejection.body_text()))
    }
}

impl From<axum::extract::rejection::PathRejection> for ApiError {
    fn from(rejection: axum::extract::rejection::PathRejection) -> Self {
        ApiError::bad_request(format!("Invalid path: {}", rejection.body_text()))
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        tracing::error!("Unhandled error: {:#}", err);
        ApiError::internal_server_error(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

/// Message of an error response, kept in the response extensions so the
/// reporter middleware can attach a stack trace when the policy allows it.
#[derive(Debug, Clone)]
pub struct ReportedError(pub String);

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let mut response = (self.status_code(), Json(self.report(false))).into_response();
        response
            .extensions_mut()
            .insert(ReportedError(self.message().to_string()));
        response
    }
}
