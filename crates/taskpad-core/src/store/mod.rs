//! Store adapters for the remote todo collection

mod firestore;
mod memory;

pub use firestore::FirestoreTodoStore;
pub use memory::MemoryTodoStore;

use crate::error::Result;
use crate::models::{Todo, TodoDraft, TodoId, TodoPatch};

/// Requested ordering for a list query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderBy {
    /// Newest first by creation time
    #[default]
    CreatedAtDesc,
}

/// Storage-agnostic specification of one owner's todo listing
///
/// Passed whole to the adapter so the interface stays free of any
/// store-specific fluent query builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub owner_id: String,
    pub order_by: OrderBy,
}

impl ListQuery {
    /// Query for all of one owner's todos, newest first
    pub fn for_owner(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            order_by: OrderBy::default(),
        }
    }
}

/// Trait for todo storage operations
///
/// Every operation is a single round trip against the backing store with no
/// internal retries; any transport or service failure surfaces as an error.
pub trait TodoStore {
    /// List the todos matching `query`; empty when the owner has none.
    /// Never returns todos belonging to other owners.
    async fn list(&self, query: &ListQuery) -> Result<Vec<Todo>>;

    /// Persist a new record for `owner_id` with a store-assigned id and
    /// `created_at == updated_at`; returns the full stored entity
    async fn create(&self, draft: &TodoDraft, owner_id: &str) -> Result<Todo>;

    /// Persist the carried field subset onto the existing record and refresh
    /// its `updated_at`; fails with `NotFound` when `id` does not exist
    async fn update(&self, id: &TodoId, patch: &TodoPatch) -> Result<()>;

    /// Remove the record; deleting an already-absent id follows the backing
    /// store's own semantics
    async fn delete(&self, id: &TodoId) -> Result<()>;
}
