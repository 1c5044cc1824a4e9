//! Notification payloads produced at the end of a trigger cycle.
//!
//! Payloads are plain data: the follow-up action is named by its effect and
//! resolved by whoever presents the notification.

use serde::{
    Deserialize,
    Serialize,
};

pub const TRIGGERED_TITLE: &str = "Successfully Triggered";
pub const TRIGGERED_MESSAGE: &str = "Your workflow_dispatch event already started to progress.";
pub const TRIGGERED_ACTION_LABEL: &str = "Check it out";

pub const DISPATCH_DISABLED_TITLE: &str = "Event Error";
pub const DISPATCH_DISABLED_MESSAGE: &str = "Your workflow_dispatch event is disabled.";
pub const DISPATCH_DISABLED_ACTION_LABEL: &str = "See more";

pub const UNKNOWN_FAILURE_TITLE: &str = "Unknown Error";
pub const UNKNOWN_FAILURE_MESSAGE: &str = "Something went wrong, try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Danger,
}

/// What happens when the user follows a notification's action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ActionEffect {
    /// Re-fetch the run list, then dismiss the notification.
    RefreshAndDismiss,
    /// Navigate to a guidance page. The notification stays up.
    OpenLink { href: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAction {
    pub label: String,
    pub effect: ActionEffect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub severity: Severity,
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<NotificationAction>,
}

impl NotificationPayload {
    pub fn triggered() -> Self {
        Self {
            severity: Severity::Success,
            title: TRIGGERED_TITLE.to_string(),
            message: TRIGGERED_MESSAGE.to_string(),
            action: Some(NotificationAction {
                label: TRIGGERED_ACTION_LABEL.to_string(),
                effect: ActionEffect::RefreshAndDismiss,
            }),
        }
    }

    pub fn dispatch_disabled(help_link: impl Into<String>) -> Self {
        Self {
            severity: Severity::Danger,
            title: DISPATCH_DISABLED_TITLE.to_string(),
            message: DISPATCH_DISABLED_MESSAGE.to_string(),
            action: Some(NotificationAction {
                label: DISPATCH_DISABLED_ACTION_LABEL.to_string(),
                effect: ActionEffect::OpenLink {
                    href: help_link.into(),
                },
            }),
        }
    }

    pub fn unknown_failure() -> Self {
        Self {
            severity: Severity::Danger,
            title: UNKNOWN_FAILURE_TITLE.to_string(),
            message: UNKNOWN_FAILURE_MESSAGE.to_string(),
            action: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.severity == Severity::Success
    }
}
