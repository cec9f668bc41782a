//! Domain core for the todo service.
//!
//! # Overview
//! Holds everything with decision logic: the `Todo` entity and its
//! validation, the error taxonomy, the `TodoRepository` persistence contract
//! and the `TodoService` use cases that tie them together. Nothing here
//! speaks HTTP or SQL.
//!
//! # Design
//! - `Todo` keeps its fields private; mutations go through methods that
//!   re-validate and re-stamp `updated_at`.
//! - `TodoRepository` is an async trait so production storage (Postgres in
//!   `todo-server`) and `InMemoryTodoRepository` are interchangeable.
//! - `TodoService` never retries; every failure is scoped to one call.

pub mod error;
pub mod repository;
pub mod types;
pub mod usecase;

pub use error::{BoxError, RepoError, TodoError, ValidationError};
pub use repository::{InMemoryTodoRepository, RepoResult, TodoRepository};
pub use types::{Todo, MAX_TITLE_LENGTH};
pub use usecase::TodoService;
