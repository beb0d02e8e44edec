//! HTTP surface for the to-do service.
//!
//! # Design
//! One handler per route, each a thin adapter: validate the request shape,
//! call exactly one [`TodoStore`] operation, map the outcome to a status
//! code and JSON body. Handlers share nothing but the store handle, so any
//! two requests may run concurrently; lost-update protection for edits to
//! the same list lives entirely in the store's per-document atomicity.
//!
//! Not-found outcomes map to 404 except list deletion, which reports a
//! `false` body with status 200. That asymmetry is deliberate (see
//! DESIGN.md).

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::dal::TodoStore;
use crate::error::Error;
use crate::types::{ListSummary, ToDoList};

/// Shared handle the handlers use to reach the store.
pub type SharedStore = Arc<dyn TodoStore>;

/// Build the API router over any [`TodoStore`] backend.
pub fn app(store: SharedStore) -> Router {
    Router::new()
        .route("/api/lists", get(get_all_lists).post(create_todo_list))
        .route("/api/lists/{list_id}", get(get_list).delete(delete_list))
        .route("/api/lists/{list_id}/items", post(create_new_item))
        .route("/api/lists/{list_id}/items/{item_id}", delete(delete_item))
        .route("/api/lists/{list_id}/checked_state", patch(set_checked_state))
        .with_state(store)
}

/// Request payload for creating a new list.
#[derive(Debug, Deserialize)]
pub struct NewList {
    pub name: String,
}

/// Response payload for a created list.
#[derive(Debug, Serialize, Deserialize)]
pub struct NewListResponse {
    pub id: String,
    pub name: String,
}

/// Request payload for creating a new item.
#[derive(Debug, Deserialize)]
pub struct NewItem {
    pub label: String,
}

/// Request payload for updating one item's checked state.
#[derive(Debug, Deserialize)]
pub struct ToDoItemUpdate {
    pub item_id: String,
    pub checked_state: bool,
}

/// Failure outcomes a handler can report.
#[derive(Debug)]
enum ApiError {
    /// The list name was present but empty.
    EmptyName,
    Store(Error),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError::Store(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::EmptyName => {
                (StatusCode::UNPROCESSABLE_ENTITY, "list name must not be empty").into_response()
            }
            ApiError::Store(Error::NotFound) => {
                (StatusCode::NOT_FOUND, "to-do list not found").into_response()
            }
            // Malformed documents and store failures are server faults, not
            // absence; log them and say nothing else to the client.
            ApiError::Store(err) => {
                tracing::error!(error = %err, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

async fn get_all_lists(State(store): State<SharedStore>) -> Result<Json<Vec<ListSummary>>, ApiError> {
    Ok(Json(store.list_todo_lists().await?))
}

async fn create_todo_list(
    State(store): State<SharedStore>,
    Json(new_list): Json<NewList>,
) -> Result<(StatusCode, Json<NewListResponse>), ApiError> {
    if new_list.name.trim().is_empty() {
        return Err(ApiError::EmptyName);
    }
    let id = store.create_todo_list(&new_list.name).await?;
    Ok((
        StatusCode::CREATED,
        Json(NewListResponse {
            id,
            name: new_list.name,
        }),
    ))
}

async fn get_list(
    State(store): State<SharedStore>,
    Path(list_id): Path<String>,
) -> Result<Json<ToDoList>, ApiError> {
    Ok(Json(store.get_todo_list(&list_id).await?))
}

async fn delete_list(
    State(store): State<SharedStore>,
    Path(list_id): Path<String>,
) -> Result<Json<bool>, ApiError> {
    Ok(Json(store.delete_todo_list(&list_id).await?))
}

async fn create_new_item(
    State(store): State<SharedStore>,
    Path(list_id): Path<String>,
    Json(new_item): Json<NewItem>,
) -> Result<(StatusCode, Json<ToDoList>), ApiError> {
    let list = store
        .create_item(&list_id, &new_item.label)
        .await?
        .ok_or(Error::NotFound)?;
    Ok((StatusCode::CREATED, Json(list)))
}

async fn delete_item(
    State(store): State<SharedStore>,
    Path((list_id, item_id)): Path<(String, String)>,
) -> Result<Json<ToDoList>, ApiError> {
    let list = store
        .delete_item(&list_id, &item_id)
        .await?
        .ok_or(Error::NotFound)?;
    Ok(Json(list))
}

async fn set_checked_state(
    State(store): State<SharedStore>,
    Path(list_id): Path<String>,
    Json(update): Json<ToDoItemUpdate>,
) -> Result<Json<ToDoList>, ApiError> {
    let list = store
        .set_checked_state(&list_id, &update.item_id, update.checked_state)
        .await?
        .ok_or(Error::NotFound)?;
    Ok(Json(list))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_list_rejects_missing_name() {
        let result: Result<NewList, _> = serde_json::from_str(r#"{"label":"nope"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn new_item_parses_label() {
        let input: NewItem = serde_json::from_str(r#"{"label":"Milk"}"#).unwrap();
        assert_eq!(input.label, "Milk");
    }

    #[test]
    fn item_update_parses_both_fields() {
        let input: ToDoItemUpdate =
            serde_json::from_str(r#"{"item_id":"a","checked_state":true}"#).unwrap();
        assert_eq!(input.item_id, "a");
        assert!(input.checked_state);
    }

    #[test]
    fn item_update_rejects_missing_checked_state() {
        let result: Result<ToDoItemUpdate, _> = serde_json::from_str(r#"{"item_id":"a"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn new_list_response_serializes_to_json() {
        let response = NewListResponse {
            id: "abc".to_string(),
            name: "Groceries".to_string(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["id"], "abc");
        assert_eq!(json["name"], "Groceries");
    }
}
