//! Todo model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A unique identifier for a todo, assigned by the remote store on creation.
///
/// Opaque to clients: never fabricated locally and never reused within a
/// session's mirror.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TodoId(String);

impl TodoId {
    /// Wrap a store-assigned identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TodoId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Workflow state of a todo
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl Status {
    /// Wire representation (`pending`, `in-progress`, `completed`)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in-progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            other => Err(format!(
                "'{other}' is not one of pending, in-progress, completed"
            )),
        }
    }
}

/// Urgency of a todo
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Wire representation (`low`, `medium`, `high`)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("'{other}' is not one of low, medium, high")),
        }
    }
}

/// Check membership in the status domain
#[must_use]
pub fn is_valid_status(value: &str) -> bool {
    Status::from_str(value).is_ok()
}

/// Check membership in the priority domain
#[must_use]
pub fn is_valid_priority(value: &str) -> bool {
    Priority::from_str(value).is_ok()
}

/// A task record owned by a single user
///
/// Serde renames match the wire field names of the remote collection
/// (`userId`, `createdAt`, `updatedAt`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Store-assigned identifier, immutable
    pub id: TodoId,
    /// Short summary, non-empty after trimming
    pub title: String,
    /// Free-form detail text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Workflow state
    pub status: Status,
    /// Urgency
    pub priority: Priority,
    /// Identifier of the authenticated user who created the record
    #[serde(rename = "userId")]
    pub owner_id: String,
    /// Set once at creation
    pub created_at: DateTime<Utc>,
    /// Refreshed on every successful update; always >= `created_at`
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// Materialize a stored todo from a validated draft.
    ///
    /// Used by store adapters once the remote has assigned an id;
    /// `created_at` and `updated_at` both start at `now`.
    #[must_use]
    pub fn from_draft(
        id: TodoId,
        draft: &TodoDraft,
        owner_id: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            status: draft.status,
            priority: draft.priority,
            owner_id: owner_id.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Extract the editable fields, e.g. to pre-fill an edit form
    #[must_use]
    pub fn draft(&self) -> TodoDraft {
        TodoDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            status: self.status,
            priority: self.priority,
        }
    }
}

/// A validated, default-applied payload ready to be persisted as a new todo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoDraft {
    pub title: String,
    pub description: Option<String>,
    pub status: Status,
    pub priority: Priority,
}

impl TodoDraft {
    /// Create a draft with the given title and the documented defaults
    /// (`pending`, `medium`)
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: Status::default(),
            priority: Priority::default(),
        }
    }

    /// Set the description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the status
    #[must_use]
    pub const fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Set the priority
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

/// Field subset applied by an update; unset fields keep their stored value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
}

impl TodoPatch {
    /// Patch carrying no fields
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the status
    #[must_use]
    pub const fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the priority
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// True when the patch carries no fields
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
    }

    /// Wire names of the carried fields, for update masks
    #[must_use]
    pub fn field_paths(&self) -> Vec<&'static str> {
        let mut paths = Vec::new();
        if self.title.is_some() {
            paths.push("title");
        }
        if self.description.is_some() {
            paths.push("description");
        }
        if self.status.is_some() {
            paths.push("status");
        }
        if self.priority.is_some() {
            paths.push("priority");
        }
        paths
    }

    /// Overwrite the carried fields on `todo` and refresh `updated_at`
    pub fn apply(&self, todo: &mut Todo, now: DateTime<Utc>) {
        if let Some(title) = &self.title {
            todo.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            todo.description = Some(description.clone());
        }
        if let Some(status) = self.status {
            todo.status = status;
        }
        if let Some(priority) = self.priority {
            todo.priority = priority;
        }
        todo.updated_at = now;
    }
}
