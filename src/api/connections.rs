use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{Map, Value};

use crate::api::body::object_from_body;
use crate::app::AppState;
use crate::db::connection_repository::ConnectionRepository;
use crate::db::models::{document_to_json, inserted_id_to_string, json_to_document};
use crate::error::{AppError, OperationContext};

/// List the connections a user initiated (`user1`).
pub async fn process_list_connections(
    repo: &dyn ConnectionRepository,
    user_id: &str,
) -> Result<Vec<Value>, AppError> {
    let connections = repo.list_for_user(user_id).await?;
    Ok(connections.into_iter().map(document_to_json).collect())
}

pub async fn process_create_connection(
    repo: &dyn ConnectionRepository,
    body: Map<String, Value>,
) -> Result<String, AppError> {
    let connection = json_to_document(body);
    let id = repo.insert(connection).await?;
    Ok(inserted_id_to_string(&id))
}

pub async fn process_accept_connection(
    repo: &dyn ConnectionRepository,
    connection_id: &str,
) -> Result<u64, AppError> {
    let accepted = repo.accept(connection_id).await?;
    tracing::debug!(connection_id, accepted, "connection accept");
    Ok(accepted)
}

pub async fn process_delete_connection(
    repo: &dyn ConnectionRepository,
    connection_id: &str,
) -> Result<u64, AppError> {
    repo.delete(connection_id).await
}

/// Axum handler for `GET /connections/{user_id}`.
pub async fn list_connections_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Value>>, AppError> {
    let connections = process_list_connections(state.connection_repo.as_ref(), &user_id)
        .await
        .doing("fetching connections")?;
    Ok(Json(connections))
}

/// Axum handler for `POST /connections`.
pub async fn create_connection_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, String), AppError> {
    let body = object_from_body(&body)?;
    let id = process_create_connection(state.connection_repo.as_ref(), body)
        .await
        .doing("sending connection request")?;
    Ok((
        StatusCode::CREATED,
        format!("Connection request created with ID: {id}"),
    ))
}

/// Axum handler for `PATCH /connections/{connection_id}`.
///
/// The request body, if any, is ignored.
pub async fn accept_connection_handler(
    State(state): State<AppState>,
    Path(connection_id): Path<String>,
) -> Result<String, AppError> {
    let accepted = process_accept_connection(state.connection_repo.as_ref(), &connection_id)
        .await
        .doing("accepting connection")?;
    Ok(format!("{accepted} connection(s) accepted"))
}

/// Axum handler for `DELETE /connections/{connection_id}`.
pub async fn delete_connection_handler(
    State(state): State<AppState>,
    Path(connection_id): Path<String>,
) -> Result<String, AppError> {
    let removed = process_delete_connection(state.connection_repo.as_ref(), &connection_id)
        .await
        .doing("removing connection")?;
    Ok(format!("{removed} connection(s) removed"))
}
