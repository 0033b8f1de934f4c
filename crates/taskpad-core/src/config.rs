//! Remote store configuration.
//!
//! Connection settings for the managed document store. Values here are
//! endpoints and public project identifiers; per-user bearer tokens come
//! from the authentication collaborator at sign-in and are attached to the
//! adapter separately.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::util::{is_http_url, normalize_text_option};

const DEFAULT_ENDPOINT: &str = "https://firestore.googleapis.com";
const DEFAULT_DATABASE_ID: &str = "(default)";
const DEFAULT_COLLECTION: &str = "todos";

/// Settings for reaching the remote todo collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Firestore project identifier (e.g. `taskpad-prod`)
    pub project_id: String,
    /// Database id; `(default)` unless the project uses named databases
    #[serde(default = "default_database_id")]
    pub database_id: String,
    /// Collection holding todo documents
    #[serde(default = "default_collection")]
    pub collection: String,
    /// Endpoint override, e.g. a local emulator
    #[serde(default)]
    pub endpoint: Option<String>,
}

fn default_database_id() -> String {
    DEFAULT_DATABASE_ID.to_string()
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

impl RemoteConfig {
    /// Create a configuration for the given project with default database,
    /// collection, and endpoint
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            database_id: default_database_id(),
            collection: default_collection(),
            endpoint: None,
        }
    }

    /// Override the collection name
    #[must_use]
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Point the adapter at a non-production endpoint
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Read configuration from `TASKPAD_PROJECT_ID` (required) and the
    /// optional `TASKPAD_DATABASE_ID`, `TASKPAD_COLLECTION`, and
    /// `TASKPAD_FIRESTORE_ENDPOINT` environment variables.
    pub fn from_env() -> Result<Self> {
        let project_id = normalize_text_option(std::env::var("TASKPAD_PROJECT_ID").ok())
            .ok_or(Error::InvalidConfiguration(
                "TASKPAD_PROJECT_ID must be set",
            ))?;

        let mut config = Self::new(project_id);
        if let Some(database_id) = normalize_text_option(std::env::var("TASKPAD_DATABASE_ID").ok())
        {
            config.database_id = database_id;
        }
        if let Some(collection) = normalize_text_option(std::env::var("TASKPAD_COLLECTION").ok()) {
            config.collection = collection;
        }
        config.endpoint = normalize_text_option(std::env::var("TASKPAD_FIRESTORE_ENDPOINT").ok());
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration can produce usable request URLs
    pub fn validate(&self) -> Result<()> {
        if self.project_id.trim().is_empty() {
            return Err(Error::InvalidConfiguration(
                "Project id must not be empty",
            ));
        }
        if self.collection.trim().is_empty() {
            return Err(Error::InvalidConfiguration(
                "Collection must not be empty",
            ));
        }
        if let Some(endpoint) = &self.endpoint {
            if !is_http_url(endpoint) {
                return Err(Error::InvalidConfiguration(
                    "Endpoint must include http:// or https://",
                ));
            }
        }
        Ok(())
    }

    /// Base URL of the documents resource for this project/database
    #[must_use]
    pub fn documents_base_url(&self) -> String {
        let endpoint = self
            .endpoint
            .as_deref()
            .unwrap_or(DEFAULT_ENDPOINT)
            .trim_end_matches('/');
        format!(
            "{endpoint}/v1/projects/{}/databases/{}/documents",
            self.project_id, self.database_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_base_url_uses_defaults() {
        let config = RemoteConfig::new("taskpad-prod");
        assert_eq!(
            config.documents_base_url(),
            "https://firestore.googleapis.com/v1/projects/taskpad-prod/databases/(default)/documents"
        );
        assert_eq!(config.collection, "todos");
    }

    #[test]
    fn documents_base_url_honors_endpoint_override() {
        let config = RemoteConfig::new("demo").with_endpoint("http://localhost:8080/");
        assert_eq!(
            config.documents_base_url(),
            "http://localhost:8080/v1/projects/demo/databases/(default)/documents"
        );
    }

    #[test]
    fn validate_rejects_blank_project_id() {
        let config = RemoteConfig::new("  ");
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_http_endpoint() {
        let config = RemoteConfig::new("demo").with_endpoint("localhost:8080");
        assert!(config.validate().is_err());
    }
}
