//! In-memory store adapter
//!
//! Plays the remote store's role for tests and local development: ids are
//! assigned store-side (UUID v7, time-sortable) and both timestamps are
//! stamped at creation.

use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{ListQuery, OrderBy, TodoStore};
use crate::error::{Error, Result};
use crate::models::{Todo, TodoDraft, TodoId, TodoPatch};

/// Process-local `TodoStore` implementation
#[derive(Debug, Default)]
pub struct MemoryTodoStore {
    todos: Mutex<Vec<Todo>>,
}

impl MemoryTodoStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TodoStore for MemoryTodoStore {
    async fn list(&self, query: &ListQuery) -> Result<Vec<Todo>> {
        let todos = self.todos.lock().await;
        let mut matches: Vec<Todo> = todos
            .iter()
            .filter(|todo| todo.owner_id == query.owner_id)
            .cloned()
            .collect();
        match query.order_by {
            OrderBy::CreatedAtDesc => {
                matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            }
        }
        Ok(matches)
    }

    async fn create(&self, draft: &TodoDraft, owner_id: &str) -> Result<Todo> {
        let id = TodoId::new(Uuid::now_v7().to_string());
        let todo = Todo::from_draft(id, draft, owner_id, Utc::now());
        self.todos.lock().await.push(todo.clone());
        Ok(todo)
    }

    async fn update(&self, id: &TodoId, patch: &TodoPatch) -> Result<()> {
        let mut todos = self.todos.lock().await;
        let todo = todos
            .iter_mut()
            .find(|todo| &todo.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        patch.apply(todo, Utc::now());
        Ok(())
    }

    async fn delete(&self, id: &TodoId) -> Result<()> {
        // Removing an absent id is a no-op, matching document-store deletes
        self.todos.lock().await.retain(|todo| &todo.id != id);
        Ok(())
    }
}
