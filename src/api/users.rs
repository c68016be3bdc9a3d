use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{Map, Value};

use crate::api::body::object_from_body;
use crate::app::AppState;
use crate::db::models::{
    bson_to_json, document_to_json, inserted_id_to_string, json_to_bson, json_to_document,
    PROFILE_VIEWS, SKILLS,
};
use crate::db::user_repository::UserRepository;
use crate::error::{AppError, OperationContext};

/// Request payload for appending a skill.
///
/// `skills` is whatever JSON value should be pushed; `null` counts as missing.
#[derive(Debug, Clone)]
pub struct AddSkillRequest {
    pub skills: Option<Value>,
}

impl AddSkillRequest {
    /// Read the request from a raw body. A missing, malformed or non-object
    /// body carries no skill.
    pub fn from_body(body: &[u8]) -> Self {
        let skills = object_from_body(body)
            .ok()
            .and_then(|mut map| map.remove(SKILLS))
            .filter(|skill| !skill.is_null());
        Self { skills }
    }
}

pub async fn process_list_users(repo: &dyn UserRepository) -> Result<Vec<Value>, AppError> {
    let users = repo.list().await?;
    Ok(users.into_iter().map(document_to_json).collect())
}

pub async fn process_get_user(repo: &dyn UserRepository, user_id: &str) -> Result<Value, AppError> {
    repo.find_by_user_id(user_id)
        .await?
        .map(document_to_json)
        .ok_or_else(|| AppError::NotFound("User not found.".into()))
}

/// Store the body verbatim. Returns the store-assigned id.
pub async fn process_create_user(
    repo: &dyn UserRepository,
    body: Map<String, Value>,
) -> Result<String, AppError> {
    let user = json_to_document(body);
    let id = repo.insert(user).await?;
    Ok(inserted_id_to_string(&id))
}

/// Merge the body into the user. Zero modified is not an error.
pub async fn process_update_user(
    repo: &dyn UserRepository,
    user_id: &str,
    body: Map<String, Value>,
) -> Result<u64, AppError> {
    let fields = json_to_document(body);
    repo.update_fields(user_id, fields).await
}

pub async fn process_delete_user(repo: &dyn UserRepository, user_id: &str) -> Result<u64, AppError> {
    let deleted = repo.delete(user_id).await?;
    tracing::debug!(user_id, deleted, "user delete");
    Ok(deleted)
}

/// Read the `profileViews` counter of a user.
///
/// A missing user is `NotFound`; a user without the field yields `null`.
pub async fn process_profile_views(
    repo: &dyn UserRepository,
    user_id: &str,
) -> Result<Value, AppError> {
    let mut projected = repo
        .find_profile_views(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found.".into()))?;

    Ok(projected
        .remove(PROFILE_VIEWS)
        .map(bson_to_json)
        .unwrap_or(Value::Null))
}

/// Append a skill to the user's `skills` array.
///
/// Validation happens before the store is touched. This is the one update
/// where zero modified documents is reported as `NotFound`.
pub async fn process_add_skill(
    repo: &dyn UserRepository,
    user_id: &str,
    request: AddSkillRequest,
) -> Result<u64, AppError> {
    let skill = request.skills.ok_or_else(|| {
        AppError::BadRequest("Skill is required and cannot be null or undefined".into())
    })?;

    let modified = repo.push_skill(user_id, json_to_bson(skill)).await?;
    if modified == 0 {
        return Err(AppError::NotFound("User not found or skill not added".into()));
    }

    Ok(modified)
}

pub async fn process_upgrade_premium(
    repo: &dyn UserRepository,
    user_id: &str,
) -> Result<u64, AppError> {
    repo.set_premium(user_id).await
}

/// Axum handler for `GET /users`.
pub async fn list_users_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Value>>, AppError> {
    let users = process_list_users(state.user_repo.as_ref())
        .await
        .doing("fetching users")?;
    Ok(Json(users))
}

/// Axum handler for `GET /users/{user_id}`.
pub async fn get_user_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let user = process_get_user(state.user_repo.as_ref(), &user_id)
        .await
        .doing("fetching user")?;
    Ok(Json(user))
}

/// Axum handler for `POST /users`.
pub async fn create_user_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, String), AppError> {
    let body = object_from_body(&body)?;
    let id = process_create_user(state.user_repo.as_ref(), body)
        .await
        .doing("adding user")?;
    Ok((StatusCode::CREATED, format!("User added with ID: {id}")))
}

/// Axum handler for `PATCH /users/{user_id}`.
pub async fn update_user_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    body: Bytes,
) -> Result<String, AppError> {
    let body = object_from_body(&body)?;
    let modified = process_update_user(state.user_repo.as_ref(), &user_id, body)
        .await
        .doing("updating user")?;
    Ok(format!("{modified} document(s) updated"))
}

/// Axum handler for `DELETE /users/{user_id}`.
pub async fn delete_user_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<String, AppError> {
    let deleted = process_delete_user(state.user_repo.as_ref(), &user_id)
        .await
        .doing("deleting user")?;
    Ok(format!("{deleted} user(s) deleted"))
}

/// Axum handler for `GET /users/{user_id}/profile-views`.
pub async fn profile_views_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let views = process_profile_views(state.user_repo.as_ref(), &user_id)
        .await
        .doing("fetching profile views")?;
    Ok(Json(views))
}

/// Axum handler for `PUT /users/{user_id}/skills`.
pub async fn add_skill_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    body: Bytes,
) -> Result<String, AppError> {
    let request = AddSkillRequest::from_body(&body);
    let added = process_add_skill(state.user_repo.as_ref(), &user_id, request)
        .await
        .doing("adding skill")?;
    Ok(format!("{added} skill(s) added"))
}

/// Axum handler for `PATCH /users/{user_id}/premium`.
pub async fn upgrade_premium_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<String, AppError> {
    let upgraded = process_upgrade_premium(state.user_repo.as_ref(), &user_id)
        .await
        .doing("upgrading user to premium")?;
    Ok(format!("{upgraded} user(s) upgraded to premium"))
}
