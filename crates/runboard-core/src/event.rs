use async_trait::async_trait;
use runboard_api::NotificationPayload;
use serde::{
    Deserialize,
    Serialize,
};
use tokio::sync::broadcast;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    TriggerStateChanged {
        busy: bool,
    },

    RunTriggered,

    TriggerFailed {
        status: Option<u16>,
        reason: String,
    },

    TriggerIgnored,

    NotificationShown {
        notification: NotificationPayload,
    },

    NotificationDismissed,

    RefreshRequested,

    RunsUpdated {
        count: usize,
        changed: bool,
        timestamp: i64,
    },

    RefreshError {
        error: String,
    },
}

impl CoreEvent {
    pub fn event_name(&self) -> &'static str {
        match self {
            CoreEvent::TriggerStateChanged { .. } => "trigger-state-changed",
            CoreEvent::RunTriggered => "run-triggered",
            CoreEvent::TriggerFailed { .. } => "trigger-failed",
            CoreEvent::TriggerIgnored => "trigger-ignored",
            CoreEvent::NotificationShown { .. } => "notification-shown",
            CoreEvent::NotificationDismissed => "notification-dismissed",
            CoreEvent::RefreshRequested => "refresh-requested",
            CoreEvent::RunsUpdated { .. } => "runs-updated",
            CoreEvent::RefreshError { .. } => "refresh-error",
        }
    }
}

#[async_trait]
pub trait EventBus: Send + Sync {
    async fn emit(&self, event: CoreEvent);

    /// Publishes without awaiting, for callers that cannot await such as
    /// `Drop` impls. Buses that cannot deliver synchronously drop the event.
    fn try_emit(&self, event: CoreEvent) {
        tracing::debug!(
            event = event.event_name(),
            "Bus has no synchronous path, event dropped"
        );
    }
}

/// Fans events out to any number of in-process subscribers.
///
/// Events emitted while nobody is subscribed are dropped.
pub struct BroadcastEventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl BroadcastEventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CoreEvent> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastEventBus {
    fn default() -> Self {
        Self::new(64)
    }
}

#[async_trait]
impl EventBus for BroadcastEventBus {
    async fn emit(&self, event: CoreEvent) {
        self.try_emit(event);
    }

    fn try_emit(&self, event: CoreEvent) {
        tracing::trace!(event = event.event_name(), "Emitting event");
        let _ = self.sender.send(event);
    }
}
