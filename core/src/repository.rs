//! Persistence gateway contract and the in-memory adapter.
//!
//! # Design
//! `TodoRepository` is the only seam between the service and storage. It is
//! `Send + Sync` so one instance can be shared behind an `Arc` by every
//! request task; implementations rely on per-statement atomicity of the
//! underlying store and take no locks across calls.
//!
//! `InMemoryTodoRepository` implements the same contract over a
//! `HashMap` and backs tests that should not need a live database.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{SubsecRound, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::RepoError;
use crate::types::Todo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage operations for todos.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Store a new todo. The id is assumed not to exist yet.
    async fn insert(&self, todo: &Todo) -> RepoResult<()>;

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Todo>;

    /// All todos, newest `created_at` first. An empty store yields an empty list.
    async fn list_all(&self) -> RepoResult<Vec<Todo>>;

    /// Overwrite the stored record with the same id.
    /// Fails with `RepoError::NotFound` if no record matched.
    async fn update(&self, todo: &Todo) -> RepoResult<()>;

    /// Fails with `RepoError::NotFound` if no record matched.
    async fn delete(&self, id: Uuid) -> RepoResult<()>;

    /// Complete every incomplete todo, refreshing `updated_at`, and return
    /// how many records changed.
    async fn complete_all(&self) -> RepoResult<u64>;
}

/// Process-local gateway backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct InMemoryTodoRepository {
    todos: RwLock<HashMap<Uuid, Todo>>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn insert(&self, todo: &Todo) -> RepoResult<()> {
        self.todos.write().await.insert(todo.id(), todo.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Todo> {
        let todos = self.todos.read().await;
        todos.get(&id).cloned().ok_or(RepoError::NotFound(id))
    }

    async fn list_all(&self) -> RepoResult<Vec<Todo>> {
        let todos = self.todos.read().await;
        let mut list: Vec<Todo> = todos.values().cloned().collect();
        list.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(list)
    }

    async fn update(&self, todo: &Todo) -> RepoResult<()> {
        let mut todos = self.todos.write().await;
        let slot = todos.get_mut(&todo.id()).ok_or(RepoError::NotFound(todo.id()))?;
        *slot = todo.clone();
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let mut todos = self.todos.write().await;
        todos.remove(&id).map(|_| ()).ok_or(RepoError::NotFound(id))
    }

    async fn complete_all(&self) -> RepoResult<u64> {
        let mut todos = self.todos.write().await;
        let now = Utc::now().trunc_subsecs(6);
        let mut count = 0;
        for todo in todos.values_mut().filter(|t| !t.completed()) {
            *todo = Todo::restore(
                todo.id(),
                todo.title().to_string(),
                todo.description().to_string(),
                true,
                todo.created_at(),
                now.max(todo.updated_at()),
            );
            count += 1;
        }
        Ok(count)
    }
}
