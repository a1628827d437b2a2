use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::error::ApiError;

/// Header the web client sends its credential in
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Verifies the request credential and injects the `IdentityClaim` into extensions
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let credential = extract_credential(&headers);
    let claim = state.verifier.verify(credential.as_deref())?;

    request.extensions_mut().insert(claim);

    Ok(next.run(request).await)
}

/// `x-auth-token: <token>`, or `Authorization: Bearer <token>`
fn extract_credential(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = headers.get(AUTH_TOKEN_HEADER).and_then(|v| v.to_str().ok()) {
        return Some(token.to_string());
    }

    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
}
