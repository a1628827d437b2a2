use axum::{
    extract::{Path, State},
    Extension,
};
use serde_json::Value;

use crate::app::AppState;
use crate::auth::IdentityClaim;
use crate::middleware::{ApiResponse, ApiResult, JsonBody};
use crate::models::{Comment, Entries, Like, Post, TextInput};
use crate::validation::parse_id;

/// POST /api/posts - Publish a post as the acting user
///
/// Expected Input:
/// ```json
/// { "text": "string" }
/// ```
pub async fn create(
    State(state): State<AppState>,
    Extension(claim): Extension<IdentityClaim>,
    JsonBody(input): JsonBody<TextInput>,
) -> ApiResult<Post> {
    let post = state.posts.create(&claim, input).await?;
    Ok(ApiResponse::created(post))
}

/// GET /api/posts - All posts, newest first
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Post>> {
    let posts = state.posts.list().await?;
    Ok(ApiResponse::success(posts))
}

/// GET /api/posts/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Post> {
    let id = parse_id("id", &id)?;
    let post = state.posts.get(id).await?;
    Ok(ApiResponse::success(post))
}

/// DELETE /api/posts/:id - Author only
pub async fn delete(
    State(state): State<AppState>,
    Extension(claim): Extension<IdentityClaim>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let id = parse_id("id", &id)?;
    state.posts.delete(&claim, id).await?;
    Ok(ApiResponse::message("Post removed"))
}

/// PUT /api/posts/like/:id - Returns the updated likes
pub async fn like(
    State(state): State<AppState>,
    Extension(claim): Extension<IdentityClaim>,
    Path(id): Path<String>,
) -> ApiResult<Entries<Like>> {
    let id = parse_id("id", &id)?;
    let likes = state.posts.like(&claim, id).await?;
    Ok(ApiResponse::success(likes))
}

/// PUT /api/posts/unlike/:id - Returns the updated likes
pub async fn unlike(
    State(state): State<AppState>,
    Extension(claim): Extension<IdentityClaim>,
    Path(id): Path<String>,
) -> ApiResult<Entries<Like>> {
    let id = parse_id("id", &id)?;
    let likes = state.posts.unlike(&claim, id).await?;
    Ok(ApiResponse::success(likes))
}

/// POST /api/posts/comment/:id - Returns the updated comments, newest first
pub async fn comment(
    State(state): State<AppState>,
    Extension(claim): Extension<IdentityClaim>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<TextInput>,
) -> ApiResult<Entries<Comment>> {
    let id = parse_id("id", &id)?;
    let comments = state.posts.comment(&claim, id, input).await?;
    Ok(ApiResponse::created(comments))
}

/// DELETE /api/posts/comment/:id/:comment_id - Comment author only
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(claim): Extension<IdentityClaim>,
    Path((id, comment_id)): Path<(String, String)>,
) -> ApiResult<Entries<Comment>> {
    let id = parse_id("id", &id)?;
    let comment_id = parse_id("comment_id", &comment_id)?;
    let comments = state.posts.delete_comment(&claim, id, comment_id).await?;
    Ok(ApiResponse::success(comments))
}
