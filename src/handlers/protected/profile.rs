use axum::{
    extract::{Path, State},
    Extension,
};
use serde_json::Value;

use crate::app::AppState;
use crate::auth::IdentityClaim;
use crate::middleware::{ApiResponse, ApiResult, JsonBody};
use crate::models::{EducationInput, ExperienceInput, Profile, ProfileInput, ProfileView};
use crate::validation::parse_id;

/// GET /api/profile/me - The acting user's own profile
pub async fn me(
    State(state): State<AppState>,
    Extension(claim): Extension<IdentityClaim>,
) -> ApiResult<ProfileView> {
    let profile = state.profiles.me(&claim).await?;
    Ok(ApiResponse::success(profile))
}

/// POST /api/profile - Create or update the acting user's profile
///
/// Only the supplied fields change. `status` and `skills` are required when no
/// profile exists yet. `skills` may be a list or a comma-separated string.
///
/// Expected Input:
/// ```json
/// {
///   "status": "Developer",
///   "skills": "rust, tokio",
///   "website": "www.example.com",
///   "youtube": "...", "twitter": "...", "instagram": "...", "linkedin": "...", "facebook": "..."
/// }
/// ```
pub async fn upsert(
    State(state): State<AppState>,
    Extension(claim): Extension<IdentityClaim>,
    JsonBody(input): JsonBody<ProfileInput>,
) -> ApiResult<Profile> {
    let profile = state.profiles.upsert(&claim, input).await?;
    Ok(ApiResponse::success(profile))
}

/// DELETE /api/profile - Remove the acting user's profile, posts and account
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(claim): Extension<IdentityClaim>,
) -> ApiResult<Value> {
    state.profiles.delete_account(&claim).await?;
    Ok(ApiResponse::message("User deleted"))
}

/// PUT /api/profile/experience
pub async fn add_experience(
    State(state): State<AppState>,
    Extension(claim): Extension<IdentityClaim>,
    JsonBody(input): JsonBody<ExperienceInput>,
) -> ApiResult<Profile> {
    let profile = state.profiles.add_experience(&claim, input).await?;
    Ok(ApiResponse::success(profile))
}

/// DELETE /api/profile/experience/:exp_id
pub async fn remove_experience(
    State(state): State<AppState>,
    Extension(claim): Extension<IdentityClaim>,
    Path(exp_id): Path<String>,
) -> ApiResult<Profile> {
    let exp_id = parse_id("exp_id", &exp_id)?;
    let profile = state.profiles.remove_experience(&claim, exp_id).await?;
    Ok(ApiResponse::success(profile))
}

/// PUT /api/profile/education
pub async fn add_education(
    State(state): State<AppState>,
    Extension(claim): Extension<IdentityClaim>,
    JsonBody(input): JsonBody<EducationInput>,
) -> ApiResult<Profile> {
    let profile = state.profiles.add_education(&claim, input).await?;
    Ok(ApiResponse::success(profile))
}

/// DELETE /api/profile/education/:edu_id
pub async fn remove_education(
    State(state): State<AppState>,
    Extension(claim): Extension<IdentityClaim>,
    Path(edu_id): Path<String>,
) -> ApiResult<Profile> {
    let edu_id = parse_id("edu_id", &edu_id)?;
    let profile = state.profiles.remove_education(&claim, edu_id).await?;
    Ok(ApiResponse::success(profile))
}
