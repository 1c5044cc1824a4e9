use runboard_api::{
    ErrorEnvelope,
    NotificationPayload,
};

/// Why a dispatch request did not succeed.
///
/// Building one never fails: a missing response, an empty body or a body
/// that is not an error envelope all end up as `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchFailure {
    /// The CI provider refused the event because the workflow has no
    /// `workflow_dispatch` trigger.
    Disabled,
    Unknown {
        status: Option<u16>,
        reason: String,
    },
}

impl DispatchFailure {
    /// Classifies a non-2xx response from the trigger endpoint
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let error = ErrorEnvelope::parse(body).and_then(|envelope| envelope.error);

        match error {
            Some(error) if error.is_dispatch_disabled() => DispatchFailure::Disabled,
            Some(error) => DispatchFailure::Unknown {
                status: error.status.or(Some(status)),
                reason: error
                    .message
                    .or(error.name)
                    .unwrap_or_else(|| format!("HTTP {status}")),
            },
            None => DispatchFailure::Unknown {
                status: Some(status),
                reason: format!("HTTP {status}"),
            },
        }
    }

    /// The request never produced a response (connect error, timeout, reset)
    pub fn transport(reason: impl Into<String>) -> Self {
        DispatchFailure::Unknown {
            status: None,
            reason: reason.into(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            DispatchFailure::Disabled => Some(422),
            DispatchFailure::Unknown { status, .. } => *status,
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            DispatchFailure::Disabled => "workflow_dispatch event is disabled",
            DispatchFailure::Unknown { reason, .. } => reason,
        }
    }

    pub fn notification(&self, help_link: &str) -> NotificationPayload {
        match self {
            DispatchFailure::Disabled => NotificationPayload::dispatch_disabled(help_link),
            DispatchFailure::Unknown { .. } => NotificationPayload::unknown_failure(),
        }
    }
}

impl std::fmt::Display for DispatchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status() {
            Some(status) => write!(f, "{} (HTTP {status})", self.reason()),
            None => f.write_str(self.reason()),
        }
    }
}

#[cfg(test)]
mod tests {
    use runboard_api::notification::{
        DISPATCH_DISABLED_MESSAGE,
        UNKNOWN_FAILURE_MESSAGE,
    };

    use super::*;

    #[test]
    fn test_disabled_envelope() {
        let body = serde_json::json!({
            "data": null,
            "error": {"status": 422, "name": "UnprocessableEntityError", "message": "x"},
        });
        let failure = DispatchFailure::from_response(422, body.to_string().as_bytes());
        assert_eq!(failure, DispatchFailure::Disabled);
        assert_eq!(
            failure.notification("/").message,
            DISPATCH_DISABLED_MESSAGE
        );
    }

    #[test]
    fn test_422_with_other_name_is_unknown() {
        let failure = DispatchFailure::from_response(
            422,
            br#"{"error":{"status":422,"name":"ValidationError"}}"#,
        );
        assert_eq!(
            failure,
            DispatchFailure::Unknown {
                status: Some(422),
                reason: "ValidationError".to_string(),
            }
        );
        assert_eq!(failure.notification("/").message, UNKNOWN_FAILURE_MESSAGE);
    }

    #[test]
    fn test_name_without_422_is_unknown() {
        let failure = DispatchFailure::from_response(
            400,
            br#"{"error":{"status":400,"name":"UnprocessableEntityError"}}"#,
        );
        assert!(matches!(failure, DispatchFailure::Unknown { .. }));
    }

    #[test]
    fn test_server_error_envelope() {
        let failure = DispatchFailure::from_response(
            500,
            br#"{"error":{"status":500,"name":"InternalServerError"}}"#,
        );
        assert_eq!(failure.status(), Some(500));
        assert_eq!(failure.notification("/").title, "Unknown Error");
    }

    #[test]
    fn test_unparseable_bodies() {
        let bodies: [&[u8]; 5] = [b"", b"Bad Gateway", b"{}", br#"{"error":null}"#, b"[1,2]"];
        for body in bodies {
            let failure = DispatchFailure::from_response(502, body);
            assert_eq!(
                failure,
                DispatchFailure::Unknown {
                    status: Some(502),
                    reason: "HTTP 502".to_string(),
                }
            );
        }
    }

    #[test]
    fn test_transport_failure_has_no_status() {
        let failure = DispatchFailure::transport("connection refused");
        assert_eq!(failure.status(), None);
        assert_eq!(failure.to_string(), "connection refused");
        assert_eq!(failure.notification("/").title, "Unknown Error");
    }
}
