//! Error types for the todo domain.
//!
//! # Design
//! Three layers, three types. `ValidationError` comes from the entity,
//! `RepoError` from a persistence gateway, and `TodoError` is what the
//! service hands back to callers. `NotFound` and validation failures pass
//! through the service unchanged; storage failures are wrapped with the
//! name of the operation that hit them.

use serde::Serialize;
use uuid::Uuid;

/// Boxed source error carried by storage failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A user input defect on a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("validation error: {field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Errors returned by `TodoRepository` implementations.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// No live record matched the identifier.
    #[error("todo {0} not found")]
    NotFound(Uuid),

    /// The store was unreachable or rejected the statement.
    #[error("storage failure: {0}")]
    Storage(#[source] BoxError),
}

impl RepoError {
    pub fn storage(err: impl Into<BoxError>) -> Self {
        Self::Storage(err.into())
    }
}

/// Errors returned by `TodoService` operations.
#[derive(Debug, thiserror::Error)]
pub enum TodoError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("todo {0} not found")]
    NotFound(Uuid),

    /// A gateway call failed. `operation` names the use-case step.
    #[error("{operation}: {source}")]
    Storage {
        operation: &'static str,
        #[source]
        source: BoxError,
    },
}

impl TodoError {
    /// Convert a gateway error, attaching `operation` to storage failures.
    pub fn from_repo(operation: &'static str, err: RepoError) -> Self {
        match err {
            RepoError::NotFound(id) => Self::NotFound(id),
            RepoError::Storage(source) => Self::Storage { operation, source },
        }
    }
}
