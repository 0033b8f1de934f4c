//! Form input validation
//!
//! Pure, synchronous parsing of raw user-entered form fields into a
//! [`TodoDraft`]. Validation failures never reach the cache or the remote
//! store; they are returned to the caller as [`FieldErrors`].

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::models::{Priority, Status, TodoDraft};

/// Field-level validation failures, keyed by form field name
///
/// Preserves insertion order so error rendering is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: Vec<(&'static str, String)>,
}

impl FieldErrors {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push((field, message.into()));
    }

    /// Message for the given field, if any
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, message)| message.as_str())
    }

    /// True when no field failed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Iterate over `(field, message)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.errors
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.errors {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// Validate a raw key/value form record into a [`TodoDraft`].
///
/// Rules:
/// - `title` is required and must be non-empty after trimming.
/// - `description` is optional and passed through unmodified (an empty
///   string is allowed and preserved).
/// - `status` / `priority` default to `pending` / `medium` when absent or
///   blank; any other value outside the enum domain is a field error, never
///   a silent default.
///
/// Unknown keys are ignored.
pub fn validate(raw: &HashMap<String, String>) -> Result<TodoDraft, FieldErrors> {
    let mut errors = FieldErrors::default();

    let title = raw.get("title").map(String::as_str).unwrap_or_default();
    if title.trim().is_empty() {
        errors.push("title", "Title is required");
    }

    let status = match present(raw, "status") {
        Some(value) => Status::from_str(value).unwrap_or_else(|message| {
            errors.push("status", message);
            Status::default()
        }),
        None => Status::default(),
    };

    let priority = match present(raw, "priority") {
        Some(value) => Priority::from_str(value).unwrap_or_else(|message| {
            errors.push("priority", message);
            Priority::default()
        }),
        None => Priority::default(),
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(TodoDraft {
        title: title.to_string(),
        description: raw.get("description").cloned(),
        status,
        priority,
    })
}

/// A field counts as present only when its trimmed value is non-empty;
/// HTML selects submit empty strings for untouched fields.
fn present<'a>(raw: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    raw.get(key)
        .map(String::as_str)
        .filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect()
    }

    #[test]
    fn test_minimal_form_applies_defaults() {
        let draft = validate(&form(&[("title", "Buy milk")])).unwrap();
        assert_eq!(draft.title, "Buy milk");
        assert_eq!(draft.description, None);
        assert_eq!(draft.status, Status::Pending);
        assert_eq!(draft.priority, Priority::Medium);
    }

    #[test]
    fn test_missing_title_is_rejected() {
        let errors = validate(&form(&[])).unwrap_err();
        assert_eq!(errors.get("title"), Some("Title is required"));
    }

    #[test]
    fn test_whitespace_title_is_rejected() {
        let errors = validate(&form(&[("title", "   ")])).unwrap_err();
        assert!(errors.get("title").is_some());
        assert!(errors.get("status").is_none());
    }

    #[test]
    fn test_explicit_enum_values_are_kept() {
        let draft = validate(&form(&[
            ("title", "Ship release"),
            ("status", "in-progress"),
            ("priority", "high"),
        ]))
        .unwrap();
        assert_eq!(draft.status, Status::InProgress);
        assert_eq!(draft.priority, Priority::High);
    }

    #[test]
    fn test_invalid_enum_value_is_an_error_not_a_default() {
        let errors = validate(&form(&[("title", "Buy milk"), ("status", "done")])).unwrap_err();
        assert!(errors.get("status").unwrap().contains("done"));
        assert!(errors.get("priority").is_none());
    }

    #[test]
    fn test_blank_select_value_counts_as_absent() {
        let draft = validate(&form(&[("title", "Buy milk"), ("status", "")])).unwrap();
        assert_eq!(draft.status, Status::Pending);
    }

    #[test]
    fn test_empty_description_is_preserved() {
        let draft = validate(&form(&[("title", "Buy milk"), ("description", "")])).unwrap();
        assert_eq!(draft.description, Some(String::new()));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let draft = validate(&form(&[("title", "Buy milk"), ("csrf_token", "x")])).unwrap();
        assert_eq!(draft.title, "Buy milk");
    }

    #[test]
    fn test_multiple_errors_are_collected_in_order() {
        let errors = validate(&form(&[("status", "done"), ("priority", "urgent")])).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|(field, _)| field).collect();
        assert_eq!(fields, vec!["title", "status", "priority"]);
        assert!(format!("{errors}").contains("title: Title is required"));
    }
}
