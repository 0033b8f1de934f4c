//! Data models for taskpad-core

mod todo;

pub use todo::{
    is_valid_priority, is_valid_status, Priority, Status, Todo, TodoDraft, TodoId, TodoPatch,
};
