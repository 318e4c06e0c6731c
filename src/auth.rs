use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use http::header;

use crate::errors::AppError;
use crate::state::AppState;

/// Stand-in for the session layer: every `/api` route requires a bearer token.
pub async fn require_bearer(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let authorized = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token == state.config.api_token)
        .unwrap_or(false);

    if !authorized {
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(req).await)
}
