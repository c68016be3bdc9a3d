use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{Map, Value};

use crate::api::body::object_from_body;
use crate::app::AppState;
use crate::db::models::{
    document_to_json, inserted_id_to_string, json_to_document, stamp_now, POST_CREATED_AT,
};
use crate::db::post_repository::PostRepository;
use crate::error::{AppError, OperationContext};

pub async fn process_list_posts(repo: &dyn PostRepository) -> Result<Vec<Value>, AppError> {
    let posts = repo.list().await?;
    Ok(posts.into_iter().map(document_to_json).collect())
}

pub async fn process_get_post(repo: &dyn PostRepository, post_id: &str) -> Result<Value, AppError> {
    repo.find_by_post_id(post_id)
        .await?
        .map(document_to_json)
        .ok_or_else(|| AppError::NotFound("Post not found.".into()))
}

/// Store the body with a server-assigned `createdAt`.
pub async fn process_create_post(
    repo: &dyn PostRepository,
    body: Map<String, Value>,
) -> Result<String, AppError> {
    let mut post = json_to_document(body);
    stamp_now(&mut post, POST_CREATED_AT);

    let id = repo.insert(post).await?;
    Ok(inserted_id_to_string(&id))
}

pub async fn process_like_post(repo: &dyn PostRepository, post_id: &str) -> Result<u64, AppError> {
    repo.increment_likes(post_id).await
}

pub async fn process_delete_post(repo: &dyn PostRepository, post_id: &str) -> Result<u64, AppError> {
    let deleted = repo.delete(post_id).await?;
    tracing::debug!(post_id, deleted, "post delete");
    Ok(deleted)
}

/// Axum handler for `GET /posts`.
pub async fn list_posts_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Value>>, AppError> {
    let posts = process_list_posts(state.post_repo.as_ref())
        .await
        .doing("fetching posts")?;
    Ok(Json(posts))
}

/// Axum handler for `GET /posts/{post_id}`.
pub async fn get_post_handler(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let post = process_get_post(state.post_repo.as_ref(), &post_id)
        .await
        .doing("fetching post")?;
    Ok(Json(post))
}

/// Axum handler for `POST /posts`.
pub async fn create_post_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, String), AppError> {
    let body = object_from_body(&body)?;
    let id = process_create_post(state.post_repo.as_ref(), body)
        .await
        .doing("adding post")?;
    Ok((StatusCode::CREATED, format!("Post added with ID: {id}")))
}

/// Axum handler for `PATCH /posts/{post_id}/likes`.
pub async fn like_post_handler(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<String, AppError> {
    let liked = process_like_post(state.post_repo.as_ref(), &post_id)
        .await
        .doing("liking post")?;
    Ok(format!("{liked} post(s) liked"))
}

/// Axum handler for `DELETE /posts/{post_id}`.
pub async fn delete_post_handler(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<String, AppError> {
    let deleted = process_delete_post(state.post_repo.as_ref(), &post_id)
        .await
        .doing("deleting post")?;
    Ok(format!("{deleted} post(s) deleted"))
}
