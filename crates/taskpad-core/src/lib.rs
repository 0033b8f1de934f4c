//! taskpad-core - Core library for Taskpad
//!
//! This crate contains the shared todo models, form validation, remote store
//! adapters, and the per-session cache used by all Taskpad interfaces.
//!
//! The remote document store is authoritative; [`TodoCache`] keeps a
//! best-effort in-memory mirror of one owner's todos and commits every
//! mutation remotely before touching the mirror.

pub mod cache;
pub mod config;
pub mod error;
pub mod form;
pub mod models;
pub mod store;
mod util;

pub use cache::TodoCache;
pub use config::RemoteConfig;
pub use error::{Error, Result};
pub use form::{validate, FieldErrors};
pub use models::{Priority, Status, Todo, TodoDraft, TodoId, TodoPatch};
pub use store::{FirestoreTodoStore, ListQuery, MemoryTodoStore, OrderBy, TodoStore};
