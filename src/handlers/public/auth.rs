use axum::extract::State;

use crate::app::AppState;
use crate::auth::Credential;
use crate::middleware::{ApiResponse, ApiResult, JsonBody};
use crate::models::{LoginInput, RegisterInput};

/// POST /api/users - Register an account and receive a credential
///
/// Expected Input:
/// ```json
/// { "name": "string", "email": "string", "password": "string (6+ chars)" }
/// ```
pub async fn register(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<RegisterInput>,
) -> ApiResult<Credential> {
    let user = state.users.register(input).await?;
    let token = state.verifier.issue(user.id)?;
    Ok(ApiResponse::created(Credential { token }))
}

/// POST /api/auth - Exchange email and password for a credential
pub async fn login(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<LoginInput>,
) -> ApiResult<Credential> {
    let user = state.users.authenticate(input).await?;
    let token = state.verifier.issue(user.id)?;
    Ok(ApiResponse::success(Credential { token }))
}
