//! Todo use cases.
//!
//! # Design
//! `TodoService` applies entity rules and drives a `TodoRepository`. Each
//! operation issues at most one read and one write, with no transaction
//! around them; a record deleted between the two calls surfaces as
//! `TodoError::NotFound` from the second one.
//!
//! The service logs through the `tracing::Span` it was constructed with,
//! so the caller decides where its events land.

use tracing::{info, Span};
use uuid::Uuid;

use crate::error::TodoError;
use crate::repository::TodoRepository;
use crate::types::Todo;

pub struct TodoService<R> {
    repo: R,
    span: Span,
}

impl<R: TodoRepository> TodoService<R> {
    pub fn new(repo: R, span: Span) -> Self {
        Self { repo, span }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub async fn create_todo(&self, title: &str, description: &str) -> Result<Todo, TodoError> {
        let todo = Todo::new(title, description)?;

        self.repo
            .insert(&todo)
            .await
            .map_err(|e| TodoError::from_repo("create todo", e))?;

        info!(parent: &self.span, id = %todo.id(), "todo created");
        Ok(todo)
    }

    pub async fn get_todo(&self, id: Uuid) -> Result<Todo, TodoError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| TodoError::from_repo("get todo", e))
    }

    pub async fn list_todos(&self) -> Result<Vec<Todo>, TodoError> {
        self.repo
            .list_all()
            .await
            .map_err(|e| TodoError::from_repo("list todos", e))
    }

    /// Rename and replace the description in memory, then write once.
    /// A rejected title discards the fetched copy without touching storage.
    pub async fn update_todo(
        &self,
        id: Uuid,
        title: &str,
        description: &str,
    ) -> Result<Todo, TodoError> {
        let mut todo = self
            .repo
            .find_by_id(id)
            .await
            .map_err(|e| TodoError::from_repo("get todo for update", e))?;

        todo.rename(title)?;
        todo.replace_description(description);

        self.repo
            .update(&todo)
            .await
            .map_err(|e| TodoError::from_repo("update todo", e))?;

        info!(parent: &self.span, id = %id, "todo updated");
        Ok(todo)
    }

    pub async fn delete_todo(&self, id: Uuid) -> Result<(), TodoError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| TodoError::from_repo("get todo for delete", e))?;

        self.repo
            .delete(id)
            .await
            .map_err(|e| TodoError::from_repo("delete todo", e))?;

        info!(parent: &self.span, id = %id, "todo deleted");
        Ok(())
    }

    pub async fn complete_todo(&self, id: Uuid) -> Result<Todo, TodoError> {
        let mut todo = self
            .repo
            .find_by_id(id)
            .await
            .map_err(|e| TodoError::from_repo("get todo for complete", e))?;

        todo.mark_complete();

        self.repo
            .update(&todo)
            .await
            .map_err(|e| TodoError::from_repo("complete todo", e))?;

        info!(parent: &self.span, id = %id, "todo completed");
        Ok(todo)
    }

    pub async fn complete_all_todos(&self) -> Result<u64, TodoError> {
        let count = self
            .repo
            .complete_all()
            .await
            .map_err(|e| TodoError::from_repo("complete all todos", e))?;

        info!(parent: &self.span, count, "all todos completed");
        Ok(count)
    }
}
