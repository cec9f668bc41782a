//! Axum handlers and wire types for `/todos`.
//!
//! Handlers only decode the request, call one `TodoService` method and
//! encode the result; all rules live in `todo-core`.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use todo_core::{Todo, TodoRepository, TodoService};
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

use crate::error::ApiError;

pub type AppState<R> = Arc<TodoService<R>>;

/// OpenAPI document for every `/todos` operation.
#[derive(OpenApi)]
#[openapi(
    info(title = "Todo API", version = "1.0.0"),
    paths(
        list_todos,
        create_todo,
        get_todo,
        update_todo,
        delete_todo,
        complete_todo,
        complete_all_todos,
    ),
    components(schemas(TodoBody, TodoInput, CompleteAllBody)),
    tags((name = "todos", description = "Todo management"))
)]
pub struct ApiDoc;

pub async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// A todo as it appears on the wire.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodoBody {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Todo> for TodoBody {
    fn from(todo: &Todo) -> Self {
        Self {
            id: todo.id(),
            title: todo.title().to_string(),
            description: todo.description().to_string(),
            completed: todo.completed(),
            created_at: todo.created_at(),
            updated_at: todo.updated_at(),
        }
    }
}

/// Request body for create and update.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TodoInput {
    #[schema(min_length = 1, max_length = 200)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Number of todos a bulk completion changed.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CompleteAllBody {
    pub count: u64,
}

#[utoipa::path(
    post,
    path = "/todos",
    tag = "todos",
    request_body = TodoInput,
    responses(
        (status = 200, description = "Todo created", body = TodoBody),
        (status = 422, description = "Title failed validation"),
    )
)]
pub async fn create_todo<R: TodoRepository + 'static>(
    State(svc): State<AppState<R>>,
    Json(input): Json<TodoInput>,
) -> Result<Json<TodoBody>, ApiError> {
    let todo = svc.create_todo(&input.title, &input.description).await?;
    Ok(Json(TodoBody::from(&todo)))
}

#[utoipa::path(
    get,
    path = "/todos/{id}",
    tag = "todos",
    params(("id" = Uuid, Path, description = "Todo id")),
    responses(
        (status = 200, description = "Todo found", body = TodoBody),
        (status = 404, description = "Todo not found"),
    )
)]
pub async fn get_todo<R: TodoRepository + 'static>(
    State(svc): State<AppState<R>>,
    Path(id): Path<Uuid>,
) -> Result<Json<TodoBody>, ApiError> {
    let todo = svc.get_todo(id).await?;
    Ok(Json(TodoBody::from(&todo)))
}

#[utoipa::path(
    get,
    path = "/todos",
    tag = "todos",
    responses((status = 200, description = "All todos, newest first", body = [TodoBody]))
)]
pub async fn list_todos<R: TodoRepository + 'static>(
    State(svc): State<AppState<R>>,
) -> Result<Json<Vec<TodoBody>>, ApiError> {
    let todos = svc.list_todos().await?;
    Ok(Json(todos.iter().map(TodoBody::from).collect()))
}

#[utoipa::path(
    put,
    path = "/todos/{id}",
    tag = "todos",
    params(("id" = Uuid, Path, description = "Todo id")),
    request_body = TodoInput,
    responses(
        (status = 200, description = "Todo updated", body = TodoBody),
        (status = 404, description = "Todo not found"),
        (status = 422, description = "Title failed validation"),
    )
)]
pub async fn update_todo<R: TodoRepository + 'static>(
    State(svc): State<AppState<R>>,
    Path(id): Path<Uuid>,
    Json(input): Json<TodoInput>,
) -> Result<Json<TodoBody>, ApiError> {
    let todo = svc
        .update_todo(id, &input.title, &input.description)
        .await?;
    Ok(Json(TodoBody::from(&todo)))
}

#[utoipa::path(
    delete,
    path = "/todos/{id}",
    tag = "todos",
    params(("id" = Uuid, Path, description = "Todo id")),
    responses(
        (status = 204, description = "Todo deleted"),
        (status = 404, description = "Todo not found"),
    )
)]
pub async fn delete_todo<R: TodoRepository + 'static>(
    State(svc): State<AppState<R>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    svc.delete_todo(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/todos/{id}/complete",
    tag = "todos",
    params(("id" = Uuid, Path, description = "Todo id")),
    responses(
        (status = 200, description = "Todo marked complete", body = TodoBody),
        (status = 404, description = "Todo not found"),
    )
)]
pub async fn complete_todo<R: TodoRepository + 'static>(
    State(svc): State<AppState<R>>,
    Path(id): Path<Uuid>,
) -> Result<Json<TodoBody>, ApiError> {
    let todo = svc.complete_todo(id).await?;
    Ok(Json(TodoBody::from(&todo)))
}

#[utoipa::path(
    post,
    path = "/todos/complete-all",
    tag = "todos",
    responses((status = 200, description = "Incomplete todos marked complete", body = CompleteAllBody))
)]
pub async fn complete_all_todos<R: TodoRepository + 'static>(
    State(svc): State<AppState<R>>,
) -> Result<Json<CompleteAllBody>, ApiError> {
    let count = svc.complete_all_todos().await?;
    Ok(Json(CompleteAllBody { count }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_body_serializes_camel_case() {
        let todo = Todo::new("Test", "desc").unwrap();
        let json = serde_json::to_value(TodoBody::from(&todo)).unwrap();
        assert_eq!(json["id"], todo.id().to_string());
        assert_eq!(json["title"], "Test");
        assert_eq!(json["description"], "desc");
        assert_eq!(json["completed"], false);
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
    }

    #[test]
    fn input_defaults_description_to_empty() {
        let input: TodoInput = serde_json::from_str(r#"{"title":"No description"}"#).unwrap();
        assert_eq!(input.title, "No description");
        assert_eq!(input.description, "");
    }

    #[test]
    fn input_rejects_missing_title() {
        let result: Result<TodoInput, _> = serde_json::from_str(r#"{"description":"x"}"#);
        assert!(result.is_err());
    }
}
