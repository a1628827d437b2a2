use axum::extract::{Path, State};
use serde_json::Value;

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::ProfileView;
use crate::validation::parse_id;

/// GET /api/profile - All profiles with owner name and avatar
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<ProfileView>> {
    let profiles = state.profiles.list().await?;
    Ok(ApiResponse::success(profiles))
}

/// GET /api/profile/user/:user_id - Profile of a given user
pub async fn by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<ProfileView> {
    let user_id = parse_id("user_id", &user_id)?;
    let profile = state.profiles.by_user(user_id).await?;
    Ok(ApiResponse::success(profile))
}

/// GET /api/profile/github/:username - Latest public repositories, passed through unchanged
pub async fn github_repos(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Value> {
    let repos = state.github.repos(&username).await?;
    Ok(ApiResponse::success(repos))
}
