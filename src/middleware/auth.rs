use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::errors::AppError;
use crate::state::AppState;

/// Verified identity attached to the request after the bearer check.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub email: String,
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = headers
        .get("authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::auth("Authentication required"))?;

    let email = state
        .token_service
        .verify(token)
        .map_err(|rejection| AppError::auth(rejection.message()))?;

    request.extensions_mut().insert(CurrentUser { email });

    Ok(next.run(request).await)
}
