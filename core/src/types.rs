//! The `Todo` entity and its mutation rules.
//!
//! # Design
//! Fields are private so the invariants cannot be bypassed: the id never
//! changes after construction, the title is always 1..=200 characters, and
//! `updated_at` never moves backwards or drops below `created_at`. Storage
//! adapters rebuild records through `Todo::restore`, which trusts the row it
//! is given.
//!
//! Timestamps are truncated to microseconds. Postgres `TIMESTAMPTZ` stores
//! that precision, so a todo read back from the database compares equal to
//! the value that was inserted.

use chrono::{DateTime, SubsecRound, Utc};
use uuid::Uuid;

use crate::error::ValidationError;

/// Maximum title length, counted in Unicode scalar values.
pub const MAX_TITLE_LENGTH: usize = 200;

/// A single todo record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    id: Uuid,
    title: String,
    description: String,
    completed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Todo {
    /// Validate `title` and build a fresh, incomplete todo with a new id.
    /// Both timestamps are set to the same instant.
    pub fn new(title: &str, description: &str) -> Result<Self, ValidationError> {
        validate_title(title)?;
        let now = now();
        Ok(Self {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: description.to_string(),
            completed: false,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuild a todo from previously persisted fields without validation.
    pub fn restore(
        id: Uuid,
        title: String,
        description: String,
        completed: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            completed,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replace the title. Leaves the todo untouched if validation fails.
    pub fn rename(&mut self, title: &str) -> Result<(), ValidationError> {
        validate_title(title)?;
        self.title = title.to_string();
        self.touch();
        Ok(())
    }

    pub fn replace_description(&mut self, description: &str) {
        self.description = description.to_string();
        self.touch();
    }

    /// Mark the todo complete. Already-complete todos are re-stamped too.
    pub fn mark_complete(&mut self) {
        self.completed = true;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = now().max(self.updated_at);
    }
}

fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.is_empty() {
        return Err(ValidationError::new("title", "must not be empty"));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(ValidationError::new(
            "title",
            format!("must not exceed {MAX_TITLE_LENGTH} characters"),
        ));
    }
    Ok(())
}
