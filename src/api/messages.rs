use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{Map, Value};

use crate::api::body::object_from_body;
use crate::app::AppState;
use crate::db::message_repository::MessageRepository;
use crate::db::models::{
    document_to_json, inserted_id_to_string, json_to_document, stamp_now, MESSAGE_SENT_AT,
};
use crate::error::{AppError, OperationContext};

/// List the messages addressed to a user (`to`).
pub async fn process_list_messages(
    repo: &dyn MessageRepository,
    user_id: &str,
) -> Result<Vec<Value>, AppError> {
    let messages = repo.list_for_recipient(user_id).await?;
    Ok(messages.into_iter().map(document_to_json).collect())
}

/// Store the body with a server-assigned `sentAt`.
pub async fn process_create_message(
    repo: &dyn MessageRepository,
    body: Map<String, Value>,
) -> Result<String, AppError> {
    let mut message = json_to_document(body);
    stamp_now(&mut message, MESSAGE_SENT_AT);

    let id = repo.insert(message).await?;
    Ok(inserted_id_to_string(&id))
}

pub async fn process_delete_message(
    repo: &dyn MessageRepository,
    message_id: &str,
) -> Result<u64, AppError> {
    repo.delete(message_id).await
}

/// Axum handler for `GET /messages/{user_id}`.
pub async fn list_messages_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Value>>, AppError> {
    let messages = process_list_messages(state.message_repo.as_ref(), &user_id)
        .await
        .doing("fetching messages")?;
    Ok(Json(messages))
}

/// Axum handler for `POST /messages`.
pub async fn create_message_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, String), AppError> {
    let body = object_from_body(&body)?;
    let id = process_create_message(state.message_repo.as_ref(), body)
        .await
        .doing("sending message")?;
    Ok((StatusCode::CREATED, format!("Message sent with ID: {id}")))
}

/// Axum handler for `DELETE /messages/{message_id}`.
pub async fn delete_message_handler(
    State(state): State<AppState>,
    Path(message_id): Path<String>,
) -> Result<String, AppError> {
    let deleted = process_delete_message(state.message_repo.as_ref(), &message_id)
        .await
        .doing("deleting message")?;
    Ok(format!("{deleted} message(s) deleted"))
}
