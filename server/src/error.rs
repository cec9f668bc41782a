//! HTTP mapping for domain errors.
//!
//! # Design
//! This is the only place the error taxonomy turns into status codes.
//! Bodies follow a small problem-details shape (`title`, `status`, `detail`).
//! Storage failures are logged here with their full cause chain and answered
//! with a generic 500 so nothing about the store leaks to clients.

use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use todo_core::{TodoError, ValidationError};

#[derive(Debug, Serialize)]
struct Problem {
    title: &'static str,
    status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<ValidationError>,
}

impl Problem {
    fn new(status: StatusCode, title: &'static str) -> Self {
        Self {
            title,
            status: status.as_u16(),
            detail: None,
            errors: Vec::new(),
        }
    }

    fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// Error returned by every handler.
#[derive(Debug)]
pub struct ApiError(pub TodoError);

impl From<TodoError> for ApiError {
    fn from(err: TodoError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            TodoError::Validation(err) => {
                let status = StatusCode::UNPROCESSABLE_ENTITY;
                let mut problem = Problem::new(status, "Unprocessable Entity");
                problem.detail = Some("validation failed".to_string());
                problem.errors.push(err);
                problem.into_response_with(status)
            }
            TodoError::NotFound(_) => {
                let status = StatusCode::NOT_FOUND;
                let mut problem = Problem::new(status, "Not Found");
                problem.detail = Some("resource not found".to_string());
                problem.into_response_with(status)
            }
            err @ TodoError::Storage { .. } => {
                tracing::error!(error = ?err, "request failed");
                internal_error()
            }
        }
    }
}

fn internal_error() -> Response {
    let status = StatusCode::INTERNAL_SERVER_ERROR;
    Problem::new(status, "Internal Server Error").into_response_with(status)
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic payload"
    }
}

/// Turn a handler panic into a logged, generic 500.
///
/// The stack is already unwound here; the panic-site backtrace is logged by
/// the hook from `telemetry::install_panic_hook`.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!(panic = panic_message(&*payload), "panic recovered");
    internal_error()
}
