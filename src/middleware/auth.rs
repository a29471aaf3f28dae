use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::RequestContext;
use crate::error::ApiError;

/// Authenticate every request and attach its [`RequestContext`].
///
/// Anonymous requests pass through with an empty context; a malformed header
/// or an unknown user ends the request here.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = state.verifier.authenticate(request.headers()).await?;
    request.extensions_mut().insert(RequestContext { identity });

    Ok(next.run(request).await)
}
