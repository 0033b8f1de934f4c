//! Session cache mirroring the remote todo collection.
//!
//! The remote store is authoritative; [`TodoCache`] keeps a best-effort
//! in-memory mirror of one owner's todos plus coarse request state. Every
//! mutation commits to the remote store first and patches the mirror only on
//! confirmation, so the mirror never shows unconfirmed state and there is no
//! rollback path.
//!
//! One instance serves one signed-in session: construct it explicitly, and
//! drop it and build a fresh one when the active user changes. Operations
//! take `&mut self`, so overlapping mutations on a single cache cannot be
//! expressed.

use chrono::Utc;

use crate::error::Error;
use crate::models::{Todo, TodoDraft, TodoId, TodoPatch};
use crate::store::{ListQuery, TodoStore};

/// In-memory mirror of one owner's todos plus request state
///
/// Failures never propagate out of the async operations; callers observe
/// them only through [`TodoCache::last_error`], which the next attempt
/// clears. `is_loading` is a single coarse flag meant for a spinner, not for
/// correctness gating.
pub struct TodoCache<S: TodoStore> {
    store: S,
    todos: Vec<Todo>,
    loading: bool,
    error: Option<String>,
}

impl<S: TodoStore> TodoCache<S> {
    /// Create an empty cache over the given store adapter
    pub fn new(store: S) -> Self {
        Self {
            store,
            todos: Vec::new(),
            loading: false,
            error: None,
        }
    }

    /// Current mirror contents, newest first
    #[must_use]
    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    /// Whether an operation is in flight
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message of the most recent failure, until a new attempt supersedes it
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The underlying store adapter
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Replace the mirror wholesale with the owner's remote todos.
    ///
    /// On failure the previous mirror is kept; a failed fetch never leaves a
    /// partial or empty overwrite behind.
    pub async fn fetch_all(&mut self, owner_id: &str) {
        self.begin();
        match self.store.list(&ListQuery::for_owner(owner_id)).await {
            Ok(todos) => {
                self.todos = todos;
                self.finish();
            }
            Err(error) => self.fail("fetch", &error),
        }
    }

    /// Persist a draft remotely, then prepend the stored entity to the
    /// mirror (preserving newest-first order). No optimistic insert happens
    /// before the remote confirms.
    pub async fn add(&mut self, draft: &TodoDraft, owner_id: &str) {
        self.begin();
        match self.store.create(draft, owner_id).await {
            Ok(todo) => {
                self.todos.insert(0, todo);
                self.finish();
            }
            Err(error) => self.fail("create", &error),
        }
    }

    /// Persist a partial update remotely, then apply the same fields to the
    /// matching local entity with a call-time `updatedAt`.
    ///
    /// An id absent from the mirror is not an error: the remote result is
    /// authoritative and the local application is simply a no-op.
    pub async fn update(&mut self, id: &TodoId, patch: &TodoPatch) {
        self.begin();
        match self.store.update(id, patch).await {
            Ok(()) => {
                let now = Utc::now();
                if let Some(todo) = self.todos.iter_mut().find(|todo| &todo.id == id) {
                    patch.apply(todo, now);
                }
                self.finish();
            }
            Err(error) => self.fail("update", &error),
        }
    }

    /// Delete remotely, then drop the matching entity from the mirror
    pub async fn remove(&mut self, id: &TodoId) {
        self.begin();
        match self.store.delete(id).await {
            Ok(()) => {
                self.todos.retain(|todo| &todo.id != id);
                self.finish();
            }
            Err(error) => self.fail("delete", &error),
        }
    }

    fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn finish(&mut self) {
        self.loading = false;
    }

    fn fail(&mut self, operation: &str, error: &Error) {
        tracing::warn!("todo {operation} failed: {error}");
        self.error = Some(error.to_string());
        self.loading = false;
    }
}
