use chrono::{
    DateTime,
    Utc,
};
use serde::{
    Deserialize,
    Serialize,
};

/// A single workflow run as listed by the history endpoint.
///
/// Only `id` is required. Everything the panel does not look at is kept in
/// `extra` so the server can forward GitHub's record without dropping fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowRun {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub conclusion: Option<String>,
    #[serde(default)]
    pub run_number: Option<i64>,
    #[serde(default)]
    pub run_started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub disabled: Option<bool>,
    #[serde(flatten, default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl WorkflowRun {
    pub fn is_completed(&self) -> bool {
        self.status.as_deref() == Some("completed")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowRunsResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
    #[serde(default)]
    pub workflow_runs: Vec<WorkflowRun>,
}

impl WorkflowRunsResponse {
    pub fn len(&self) -> usize {
        self.workflow_runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workflow_runs.is_empty()
    }
}

/// Error names used in the `error.name` field of a failed response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorName {
    Validation,
    Unauthorized,
    Forbidden,
    NotFound,
    UnprocessableEntity,
    Application,
}

impl ErrorName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorName::Validation => "ValidationError",
            ErrorName::Unauthorized => "UnauthorizedError",
            ErrorName::Forbidden => "ForbiddenError",
            ErrorName::NotFound => "NotFoundError",
            ErrorName::UnprocessableEntity => "UnprocessableEntityError",
            ErrorName::Application => "ApplicationError",
        }
    }

    pub fn from_status(status: u16) -> Self {
        match status {
            400 => ErrorName::Validation,
            401 => ErrorName::Unauthorized,
            403 => ErrorName::Forbidden,
            404 => ErrorName::NotFound,
            422 => ErrorName::UnprocessableEntity,
            _ => ErrorName::Application,
        }
    }
}

impl std::fmt::Display for ErrorName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            name: Some(ErrorName::from_status(status).to_string()),
            message: Some(message.into()),
            details: Some(serde_json::json!({})),
        }
    }

    /// The dispatch endpoint refused the event because the workflow has no
    /// `workflow_dispatch` trigger.
    pub fn is_dispatch_disabled(&self) -> bool {
        self.status == Some(422)
            && self.name.as_deref() == Some(ErrorName::UnprocessableEntity.as_str())
    }
}

/// Body of a failed plugin response: `{ "data": null, "error": { ... } }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<ErrorBody>,
}

impl ErrorEnvelope {
    pub fn new(error: ErrorBody) -> Self {
        Self {
            data: None,
            error: Some(error),
        }
    }

    /// Parses a response body, returning `None` for anything that is not an
    /// envelope (empty bodies, HTML error pages, plain text).
    pub fn parse(body: &[u8]) -> Option<Self> {
        serde_json::from_slice(body).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_tolerates_missing_fields() {
        let run: WorkflowRun = serde_json::from_str(r#"{"id": 7}"#).unwrap();
        assert_eq!(run.id, 7);
        assert!(run.name.is_none());
        assert!(run.disabled.is_none());
        assert!(run.extra.is_empty());
    }

    #[test]
    fn test_run_keeps_unknown_fields() {
        let run: WorkflowRun = serde_json::from_str(
            r#"{"id": 1, "name": "CI", "head_branch": "main", "run_attempt": 2}"#,
        )
        .unwrap();

        assert_eq!(run.name.as_deref(), Some("CI"));
        assert_eq!(run.extra.get("head_branch"), Some(&serde_json::json!("main")));

        let json = serde_json::to_value(&run).unwrap();
        assert_eq!(json["run_attempt"], 2);
    }

    #[test]
    fn test_runs_response_defaults_to_empty() {
        let response: WorkflowRunsResponse = serde_json::from_str("{}").unwrap();
        assert!(response.is_empty());
        assert_eq!(response.total_count, None);
    }

    #[test]
    fn test_error_name_from_status() {
        assert_eq!(ErrorName::from_status(422).as_str(), "UnprocessableEntityError");
        assert_eq!(ErrorName::from_status(404).as_str(), "NotFoundError");
        assert_eq!(ErrorName::from_status(500).as_str(), "ApplicationError");
        assert_eq!(ErrorName::from_status(502).as_str(), "ApplicationError");
    }

    #[test]
    fn test_dispatch_disabled_requires_status_and_name() {
        assert!(ErrorBody::new(422, "disabled").is_dispatch_disabled());

        let wrong_name = ErrorBody {
            status: Some(422),
            name: Some("ValidationError".to_string()),
            ..Default::default()
        };
        assert!(!wrong_name.is_dispatch_disabled());

        let wrong_status = ErrorBody {
            status: Some(400),
            name: Some("UnprocessableEntityError".to_string()),
            ..Default::default()
        };
        assert!(!wrong_status.is_dispatch_disabled());
    }

    #[test]
    fn test_envelope_parse() {
        let envelope = ErrorEnvelope::parse(
            br#"{"data":null,"error":{"status":422,"name":"UnprocessableEntityError"}}"#,
        )
        .unwrap();
        assert!(envelope.error.unwrap().is_dispatch_disabled());

        assert!(ErrorEnvelope::parse(b"").is_none());
        assert!(ErrorEnvelope::parse(b"<html>Bad Gateway</html>").is_none());
    }

    #[test]
    fn test_envelope_serializes_null_data() {
        let json = serde_json::to_value(ErrorEnvelope::new(ErrorBody::new(500, "boom"))).unwrap();
        assert!(json["data"].is_null());
        assert_eq!(json["error"]["name"], "ApplicationError");
        assert_eq!(json["error"]["status"], 500);
    }
}
