use std::any::Any;

use axum::{
    extract::{Request, State},
    http::{Method, Uri},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};

use crate::app::AppState;
use crate::error::{ApiError, ErrorReport, ReportedError};

/// Outermost reporting step: every error envelope passes through here once.
/// The stack trace is only captured and attached when traces are exposed.
pub async fn apply_trace_policy(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let Some(ReportedError(message)) = response.extensions_mut().remove::<ReportedError>() else {
        return response;
    };
    if !state.config.security.expose_stack_traces {
        return response;
    }

    let report = ErrorReport::new(message, true);
    (response.status(), Json(report)).into_response()
}

/// Converts a handler panic into a 500 error envelope
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        format!("Panic: {}", s)
    } else if let Some(s) = err.downcast_ref::<&str>() {
        format!("Panic: {}", s)
    } else {
        "Panic with object of unknown type".to_string()
    };

    tracing::error!("Request handler panicked: {}", message);
    ApiError::internal_server_error(message).into_response()
}

pub async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("No route for {}", uri.path()))
}

/// Fallback for a known path hit with a method it does not serve
pub async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    ApiError::method_not_allowed(format!("Method {} not allowed for {}", method, uri.path()))
}
