use axum::{extract::State, Extension};

use crate::app::AppState;
use crate::auth::IdentityClaim;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::UserView;

/// GET /api/auth - The user the credential belongs to
///
/// Answers 404 when the credential is valid but the account has since been deleted.
pub async fn current_user(
    State(state): State<AppState>,
    Extension(claim): Extension<IdentityClaim>,
) -> ApiResult<UserView> {
    let user = state.users.current(&claim).await?;
    Ok(ApiResponse::success(user.view()))
}
