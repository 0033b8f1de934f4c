//! Firestore REST adapter for the remote todo collection.
//!
//! Talks to the Firestore v1 document API directly over HTTPS (no SDK).
//! Each operation is a single round trip with no internal retries; the
//! caller decides what a failure means.
//!
//! Timestamps are stamped client-side on create and update, so the decoded
//! entity returned by [`FirestoreTodoStore::create`] matches what the server
//! stored without a second read.

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::{ListQuery, OrderBy, TodoStore};
use crate::config::RemoteConfig;
use crate::error::{Error, Result};
use crate::models::{Priority, Status, Todo, TodoDraft, TodoId, TodoPatch};
use crate::util::{compact_text, normalize_text_option};

/// `TodoStore` backed by the Firestore REST v1 API
pub struct FirestoreTodoStore {
    base_url: String,
    collection: String,
    auth_token: Option<String>,
    client: Client,
}

impl FirestoreTodoStore {
    /// Build an adapter from a validated configuration
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            base_url: config.documents_base_url(),
            collection: config.collection.clone(),
            auth_token: None,
            client: Client::builder().build()?,
        })
    }

    /// Attach the signed-in user's bearer token to subsequent requests.
    ///
    /// Authorization itself is enforced by the store's access rules; this
    /// adapter only forwards the credential.
    #[must_use]
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = normalize_text_option(Some(token.into()));
        self
    }

    fn collection_url(&self) -> String {
        format!("{}/{}", self.base_url, self.collection)
    }

    fn document_url(&self, id: &TodoId) -> String {
        format!("{}/{}/{}", self.base_url, self.collection, id)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request and map non-success statuses to adapter errors
    async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let response = self.authorized(request).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = parse_api_error(status, &body);
        if status == StatusCode::NOT_FOUND {
            Err(Error::NotFound(message))
        } else {
            Err(Error::Remote(message))
        }
    }
}

impl TodoStore for FirestoreTodoStore {
    async fn list(&self, query: &ListQuery) -> Result<Vec<Todo>> {
        let payload = json!({
            "structuredQuery": {
                "from": [{ "collectionId": self.collection }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": "userId" },
                        "op": "EQUAL",
                        "value": { "stringValue": query.owner_id },
                    }
                },
                "orderBy": [order_by_clause(query.order_by)],
            }
        });

        let response = self
            .execute(
                self.client
                    .post(format!("{}:runQuery", self.base_url))
                    .json(&payload),
            )
            .await?;

        // runQuery streams one object per result; trailing objects without a
        // `document` key carry only read metadata.
        let rows: Vec<Value> = response.json().await?;
        let mut todos = Vec::new();
        for row in &rows {
            if let Some(document) = row.get("document") {
                todos.push(decode_document(document)?);
            }
        }

        tracing::debug!("listed {} todos for owner {}", todos.len(), query.owner_id);
        Ok(todos)
    }

    async fn create(&self, draft: &TodoDraft, owner_id: &str) -> Result<Todo> {
        let now = Utc::now();
        let payload = json!({ "fields": draft_fields(draft, owner_id, now) });

        let response = self
            .execute(self.client.post(self.collection_url()).json(&payload))
            .await?;
        let document: Value = response.json().await?;
        let todo = decode_document(&document)?;

        tracing::debug!("created todo {} for owner {owner_id}", todo.id);
        Ok(todo)
    }

    async fn update(&self, id: &TodoId, patch: &TodoPatch) -> Result<()> {
        let now = Utc::now();
        let (fields, mask) = patch_fields(patch, now);

        let mut request = self
            .client
            .patch(self.document_url(id))
            // Precondition turns the upsert into a strict update: an absent
            // document yields 404 instead of being created.
            .query(&[("currentDocument.exists", "true")])
            .json(&json!({ "fields": fields }));
        for path in mask {
            request = request.query(&[("updateMask.fieldPaths", path)]);
        }

        self.execute(request).await?;
        tracing::debug!("updated todo {id}");
        Ok(())
    }

    async fn delete(&self, id: &TodoId) -> Result<()> {
        // No existence precondition: deleting an absent document succeeds,
        // which keeps the operation idempotent for callers.
        self.execute(self.client.delete(self.document_url(id)))
            .await?;
        tracing::debug!("deleted todo {id}");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Document encoding/decoding
// ---------------------------------------------------------------------------

fn string_value(value: &str) -> Value {
    json!({ "stringValue": value })
}

fn timestamp_value(value: DateTime<Utc>) -> Value {
    json!({ "timestampValue": value.to_rfc3339_opts(SecondsFormat::Micros, true) })
}

fn order_by_clause(order_by: OrderBy) -> Value {
    match order_by {
        OrderBy::CreatedAtDesc => json!({
            "field": { "fieldPath": "createdAt" },
            "direction": "DESCENDING",
        }),
    }
}

/// Encode a creation payload; both timestamps start at `now`
fn draft_fields(draft: &TodoDraft, owner_id: &str, now: DateTime<Utc>) -> Value {
    let mut fields = Map::new();
    fields.insert("title".to_string(), string_value(&draft.title));
    if let Some(description) = &draft.description {
        fields.insert("description".to_string(), string_value(description));
    }
    fields.insert("status".to_string(), string_value(draft.status.as_str()));
    fields.insert(
        "priority".to_string(),
        string_value(draft.priority.as_str()),
    );
    fields.insert("userId".to_string(), string_value(owner_id));
    fields.insert("createdAt".to_string(), timestamp_value(now));
    fields.insert("updatedAt".to_string(), timestamp_value(now));
    Value::Object(fields)
}

/// Encode an update payload plus its update mask; `updatedAt` always rides
/// along so the stored record reflects the write time
fn patch_fields(patch: &TodoPatch, now: DateTime<Utc>) -> (Value, Vec<&'static str>) {
    let mut fields = Map::new();
    if let Some(title) = &patch.title {
        fields.insert("title".to_string(), string_value(title));
    }
    if let Some(description) = &patch.description {
        fields.insert("description".to_string(), string_value(description));
    }
    if let Some(status) = patch.status {
        fields.insert("status".to_string(), string_value(status.as_str()));
    }
    if let Some(priority) = patch.priority {
        fields.insert("priority".to_string(), string_value(priority.as_str()));
    }
    fields.insert("updatedAt".to_string(), timestamp_value(now));

    let mut mask = patch.field_paths();
    mask.push("updatedAt");
    (Value::Object(fields), mask)
}

/// Decode a Firestore document into a [`Todo`]
///
/// The document id is the last segment of the resource name; all other
/// fields live under `fields` as typed values.
fn decode_document(document: &Value) -> Result<Todo> {
    let name = document
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed("name"))?;
    let id = name
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .ok_or_else(|| malformed("name"))?;

    let fields = document
        .get("fields")
        .and_then(Value::as_object)
        .ok_or_else(|| malformed("fields"))?;

    let status: Status = string_field(fields, "status")?
        .parse()
        .map_err(|_| malformed("status"))?;
    let priority: Priority = string_field(fields, "priority")?
        .parse()
        .map_err(|_| malformed("priority"))?;

    Ok(Todo {
        id: TodoId::new(id),
        title: string_field(fields, "title")?,
        description: optional_string_field(fields, "description"),
        status,
        priority,
        owner_id: string_field(fields, "userId")?,
        created_at: timestamp_field(fields, "createdAt")?,
        updated_at: timestamp_field(fields, "updatedAt")?,
    })
}

fn malformed(field: &str) -> Error {
    Error::Remote(format!("malformed document: bad or missing '{field}'"))
}

fn string_field(fields: &Map<String, Value>, name: &str) -> Result<String> {
    optional_string_field(fields, name).ok_or_else(|| malformed(name))
}

fn optional_string_field(fields: &Map<String, Value>, name: &str) -> Option<String> {
    fields
        .get(name)?
        .get("stringValue")?
        .as_str()
        .map(ToString::to_string)
}

fn timestamp_field(fields: &Map<String, Value>, name: &str) -> Result<DateTime<Utc>> {
    let raw = fields
        .get(name)
        .and_then(|value| value.get("timestampValue"))
        .and_then(Value::as_str)
        .ok_or_else(|| malformed(name))?;
    DateTime::parse_from_rfc3339(raw)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| malformed(name))
}

// ---------------------------------------------------------------------------
// API error rendering
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

/// Condense an error response into one opaque message string
fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorResponse>(body) {
        if let Some(message) = payload.error.and_then(|error| error.message) {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", compact_text(trimmed), status.as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn sample_document() -> Value {
        json!({
            "name": "projects/demo/databases/(default)/documents/todos/abc123",
            "fields": {
                "title": { "stringValue": "Buy milk" },
                "description": { "stringValue": "2 liters" },
                "status": { "stringValue": "in-progress" },
                "priority": { "stringValue": "high" },
                "userId": { "stringValue": "u1" },
                "createdAt": { "timestampValue": "2026-08-20T10:00:00.000000Z" },
                "updatedAt": { "timestampValue": "2026-08-21T09:30:00.000000Z" },
            },
            "createTime": "2026-08-20T10:00:00.000001Z",
            "updateTime": "2026-08-21T09:30:00.000001Z",
        })
    }

    #[test]
    fn decode_document_reads_all_fields() {
        let todo = decode_document(&sample_document()).unwrap();
        assert_eq!(todo.id.as_str(), "abc123");
        assert_eq!(todo.title, "Buy milk");
        assert_eq!(todo.description.as_deref(), Some("2 liters"));
        assert_eq!(todo.status, Status::InProgress);
        assert_eq!(todo.priority, Priority::High);
        assert_eq!(todo.owner_id, "u1");
        assert!(todo.updated_at >= todo.created_at);
    }

    #[test]
    fn decode_document_tolerates_absent_description() {
        let mut document = sample_document();
        document["fields"]
            .as_object_mut()
            .unwrap()
            .remove("description");
        let todo = decode_document(&document).unwrap();
        assert_eq!(todo.description, None);
    }

    #[test]
    fn decode_document_rejects_missing_title() {
        let mut document = sample_document();
        document["fields"].as_object_mut().unwrap().remove("title");
        let error = decode_document(&document).unwrap_err();
        assert!(error.to_string().contains("title"));
    }

    #[test]
    fn decode_document_rejects_unknown_status() {
        let mut document = sample_document();
        document["fields"]["status"] = json!({ "stringValue": "done" });
        assert!(decode_document(&document).is_err());
    }

    #[test]
    fn draft_fields_carry_exact_wire_names() {
        let draft = TodoDraft::new("Buy milk");
        let fields = draft_fields(&draft, "u1", Utc::now());
        let object = fields.as_object().unwrap();
        for name in ["title", "status", "priority", "userId", "createdAt", "updatedAt"] {
            assert!(object.contains_key(name), "missing field {name}");
        }
        assert!(!object.contains_key("description"));
        assert_eq!(object["status"]["stringValue"], "pending");
        assert_eq!(object["priority"]["stringValue"], "medium");
        assert_eq!(object["createdAt"], object["updatedAt"]);
    }

    #[test]
    fn patch_fields_mask_lists_carried_fields_plus_updated_at() {
        let patch = TodoPatch::new().with_status(Status::Completed);
        let (fields, mask) = patch_fields(&patch, Utc::now());
        assert_eq!(mask, vec!["status", "updatedAt"]);
        let object = fields.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert_eq!(object["status"]["stringValue"], "completed");
    }

    #[test]
    fn draft_fields_round_trip_through_decode() {
        let draft = TodoDraft::new("Ship release")
            .with_description("cut the tag")
            .with_status(Status::InProgress)
            .with_priority(Priority::High);
        let now = Utc::now();
        let document = json!({
            "name": "projects/demo/databases/(default)/documents/todos/xyz",
            "fields": draft_fields(&draft, "u7", now),
        });

        let todo = decode_document(&document).unwrap();
        assert_eq!(todo.draft(), draft);
        assert_eq!(todo.owner_id, "u7");
        assert_eq!(todo.created_at, todo.updated_at);
    }

    #[test]
    fn parse_api_error_prefers_structured_message() {
        let body = r#"{ "error": { "code": 403, "message": "Missing or insufficient permissions.", "status": "PERMISSION_DENIED" } }"#;
        assert_eq!(
            parse_api_error(StatusCode::FORBIDDEN, body),
            "Missing or insufficient permissions. (403)"
        );
    }

    #[test]
    fn parse_api_error_falls_back_to_body_then_status() {
        assert_eq!(
            parse_api_error(StatusCode::BAD_GATEWAY, "upstream connect error"),
            "upstream connect error (502)"
        );
        assert_eq!(
            parse_api_error(StatusCode::SERVICE_UNAVAILABLE, ""),
            "HTTP 503"
        );
    }

    #[test]
    fn document_urls_are_rooted_at_the_collection() {
        let store =
            FirestoreTodoStore::new(&RemoteConfig::new("demo")).unwrap();
        assert!(store.collection_url().ends_with("/documents/todos"));
        assert!(store
            .document_url(&TodoId::new("abc"))
            .ends_with("/documents/todos/abc"));
    }

    /// Integration test against a real Firestore project - only runs when
    /// env vars are set.
    /// Run with: TASKPAD_PROJECT_ID=... TASKPAD_AUTH_TOKEN=... cargo test firestore_crud -- --ignored
    #[tokio::test(flavor = "multi_thread")]
    #[ignore = "Requires TASKPAD_PROJECT_ID and TASKPAD_AUTH_TOKEN"]
    async fn firestore_crud_round_trip() {
        dotenvy::dotenv().ok();
        let config = RemoteConfig::from_env().expect("TASKPAD_PROJECT_ID must be set");
        let token = env::var("TASKPAD_AUTH_TOKEN").expect("TASKPAD_AUTH_TOKEN must be set");
        let store = FirestoreTodoStore::new(&config)
            .unwrap()
            .with_auth_token(token);
        let owner = format!("it-{}", Utc::now().timestamp_millis());

        let created = store
            .create(&TodoDraft::new("integration todo"), &owner)
            .await
            .expect("create should succeed");

        let listed = store
            .list(&ListQuery::for_owner(&owner))
            .await
            .expect("list should succeed");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);

        store
            .update(
                &created.id,
                &TodoPatch::new().with_status(Status::Completed),
            )
            .await
            .expect("update should succeed");

        store.delete(&created.id).await.expect("delete should succeed");
        let remaining = store.list(&ListQuery::for_owner(&owner)).await.unwrap();
        assert!(remaining.is_empty());
    }
}
