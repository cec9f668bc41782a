//! PostgreSQL-backed `TodoRepository`.
//!
//! Every method is a single statement against the pool, so concurrent
//! callers rely on Postgres' per-statement atomicity. A zero row count on
//! UPDATE or DELETE means the id did not exist.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::FromRow;
use uuid::Uuid;

use todo_core::{RepoError, RepoResult, Todo, TodoRepository};

use crate::config::Config;

/// Embedded schema migrations for the `todos` table.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

const INSERT_TODO: &str = r#"
    INSERT INTO todos (id, title, description, completed, created_at, updated_at)
    VALUES ($1, $2, $3, $4, $5, $6)
"#;

const SELECT_TODO_BY_ID: &str = r#"
    SELECT id, title, description, completed, created_at, updated_at
    FROM todos
    WHERE id = $1
"#;

const SELECT_TODOS: &str = r#"
    SELECT id, title, description, completed, created_at, updated_at
    FROM todos
    ORDER BY created_at DESC
"#;

const UPDATE_TODO: &str = r#"
    UPDATE todos
    SET title = $2, description = $3, completed = $4, updated_at = $5
    WHERE id = $1
"#;

const DELETE_TODO: &str = "DELETE FROM todos WHERE id = $1";

const COMPLETE_ALL: &str = r#"
    UPDATE todos
    SET completed = TRUE, updated_at = GREATEST(NOW(), updated_at)
    WHERE completed = FALSE
"#;

const APPLIED_MIGRATIONS: &str = r#"
    SELECT version
    FROM _sqlx_migrations
    WHERE success
    ORDER BY version DESC
"#;

/// The newest successfully applied migration and the version `undo` should
/// stop at to revert only that one. `None` when nothing has been applied.
pub async fn rollback_target(pool: &PgPool) -> Result<Option<(i64, i64)>, sqlx::Error> {
    let applied: Vec<i64> = sqlx::query_scalar(APPLIED_MIGRATIONS)
        .fetch_all(pool)
        .await?;
    Ok(applied
        .first()
        .map(|&latest| (latest, applied.get(1).copied().unwrap_or(0))))
}

/// Open a pool sized from `config` and check it answers.
pub async fn connect(config: &Config) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(config.request_timeout)
        .connect(&config.database_url)
        .await?;

    let _: (i32,) = sqlx::query_as("SELECT 1").fetch_one(&pool).await?;
    Ok(pool)
}

#[derive(Debug, FromRow)]
struct TodoRow {
    id: Uuid,
    title: String,
    description: String,
    completed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TodoRow> for Todo {
    fn from(row: TodoRow) -> Self {
        Todo::restore(
            row.id,
            row.title,
            row.description,
            row.completed,
            row.created_at,
            row.updated_at,
        )
    }
}

#[derive(Clone)]
pub struct PostgresTodoRepository {
    pool: PgPool,
}

impl PostgresTodoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl TodoRepository for PostgresTodoRepository {
    async fn insert(&self, todo: &Todo) -> RepoResult<()> {
        sqlx::query(INSERT_TODO)
            .bind(todo.id())
            .bind(todo.title())
            .bind(todo.description())
            .bind(todo.completed())
            .bind(todo.created_at())
            .bind(todo.updated_at())
            .execute(&self.pool)
            .await
            .map_err(RepoError::storage)?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Todo> {
        let row = sqlx::query_as::<_, TodoRow>(SELECT_TODO_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepoError::storage)?;

        row.map(Todo::from).ok_or(RepoError::NotFound(id))
    }

    async fn list_all(&self) -> RepoResult<Vec<Todo>> {
        let rows = sqlx::query_as::<_, TodoRow>(SELECT_TODOS)
            .fetch_all(&self.pool)
            .await
            .map_err(RepoError::storage)?;

        Ok(rows.into_iter().map(Todo::from).collect())
    }

    async fn update(&self, todo: &Todo) -> RepoResult<()> {
        let result = sqlx::query(UPDATE_TODO)
            .bind(todo.id())
            .bind(todo.title())
            .bind(todo.description())
            .bind(todo.completed())
            .bind(todo.updated_at())
            .execute(&self.pool)
            .await
            .map_err(RepoError::storage)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound(todo.id()));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let result = sqlx::query(DELETE_TODO)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(RepoError::storage)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    async fn complete_all(&self) -> RepoResult<u64> {
        let result = sqlx::query(COMPLETE_ALL)
            .execute(&self.pool)
            .await
            .map_err(RepoError::storage)?;

        Ok(result.rows_affected())
    }
}
