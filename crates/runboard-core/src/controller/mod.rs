//! Trigger controller: busy flag, dispatch call, result classification and
//! notification handling for the "run workflow" action.

mod failure;
mod state;

use std::sync::{
    Arc,
    Mutex,
    MutexGuard,
    PoisonError,
};

use async_trait::async_trait;
pub use failure::DispatchFailure;
use runboard_api::NotificationPayload;
pub use state::{
    Effect,
    PanelEvent,
    PanelState,
};

use crate::event::{
    CoreEvent,
    EventBus,
};
use crate::refresh::RefreshSource;

/// Sends one dispatch request to the CI provider
#[async_trait]
pub trait DispatchTarget: Send + Sync {
    async fn dispatch(&self) -> Result<(), DispatchFailure>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    Triggered,
    Failed(DispatchFailure),
    /// Another trigger was still in flight; no request was sent.
    AlreadyInFlight,
}

pub struct TriggerController {
    state: Mutex<PanelState>,
    dispatcher: Arc<dyn DispatchTarget>,
    refresh: Arc<dyn RefreshSource>,
    event_bus: Arc<dyn EventBus>,
}

impl TriggerController {
    pub fn new(
        dispatcher: Arc<dyn DispatchTarget>, refresh: Arc<dyn RefreshSource>,
        event_bus: Arc<dyn EventBus>, help_link: impl Into<String>,
    ) -> Self {
        Self {
            state: Mutex::new(PanelState::new(help_link)),
            dispatcher,
            refresh,
            event_bus,
        }
    }

    pub fn snapshot(&self) -> PanelState {
        self.lock().clone()
    }

    pub fn is_busy(&self) -> bool {
        self.lock().is_busy()
    }

    pub fn notification(&self) -> Option<NotificationPayload> {
        self.lock().notification().cloned()
    }

    /// Runs one trigger cycle.
    ///
    /// Returns `AlreadyInFlight` without contacting the provider when a
    /// previous cycle has not resolved yet. The busy flag is cleared on every
    /// exit path, including when this future is dropped mid-flight.
    pub async fn trigger_run(&self) -> TriggerOutcome {
        let effects = self.apply(PanelEvent::TriggerRequested);
        if !effects.contains(&Effect::Dispatch) {
            tracing::debug!("Trigger already in flight, ignoring request");
            self.event_bus.emit(CoreEvent::TriggerIgnored).await;
            return TriggerOutcome::AlreadyInFlight;
        }

        let guard = BusyGuard::new(&self.state, self.event_bus.as_ref());
        self.event_bus
            .emit(CoreEvent::TriggerStateChanged { busy: true })
            .await;

        tracing::info!("Dispatching workflow run");
        let result = self.dispatcher.dispatch().await;

        let (event, outcome) = match result {
            Ok(()) => (PanelEvent::TriggerSucceeded, TriggerOutcome::Triggered),
            Err(failure) => {
                tracing::warn!(
                    status = ?failure.status(),
                    reason = %failure.reason(),
                    "Workflow dispatch failed"
                );
                (
                    PanelEvent::TriggerFailed(failure.clone()),
                    TriggerOutcome::Failed(failure),
                )
            }
        };

        let notification = {
            let mut state = self.lock();
            guard.disarm();
            state.apply(event);
            state.notification().cloned()
        };

        self.event_bus
            .emit(CoreEvent::TriggerStateChanged { busy: false })
            .await;

        match &outcome {
            TriggerOutcome::Triggered => {
                tracing::info!("Workflow run triggered");
                self.event_bus.emit(CoreEvent::RunTriggered).await;
            }
            TriggerOutcome::Failed(failure) => {
                self.event_bus
                    .emit(CoreEvent::TriggerFailed {
                        status: failure.status(),
                        reason: failure.reason().to_string(),
                    })
                    .await;
            }
            TriggerOutcome::AlreadyInFlight => {}
        }

        if let Some(notification) = notification {
            self.event_bus
                .emit(CoreEvent::NotificationShown { notification })
                .await;
        }

        outcome
    }

    /// Clears the current notification. Returns whether one was showing.
    pub async fn dismiss_notification(&self) -> bool {
        let had_notification = {
            let mut state = self.lock();
            let had = state.notification().is_some();
            state.apply(PanelEvent::NotificationDismissed);
            had
        };

        if had_notification {
            self.event_bus.emit(CoreEvent::NotificationDismissed).await;
        }
        had_notification
    }

    /// Follows the current notification's action.
    ///
    /// A refresh is requested from the refresh source here; the returned
    /// effects tell the presenter what happened and which link to open, if any.
    pub async fn invoke_notification_action(&self) -> Vec<Effect> {
        let effects = self.apply(PanelEvent::NotificationActionInvoked);

        for effect in &effects {
            match effect {
                Effect::RequestRefresh => {
                    self.refresh.request_refresh();
                    self.event_bus.emit(CoreEvent::RefreshRequested).await;
                    self.event_bus.emit(CoreEvent::NotificationDismissed).await;
                }
                Effect::OpenLink(href) => {
                    tracing::debug!(href = %href, "Notification link followed");
                }
                Effect::Dispatch => {}
            }
        }

        effects
    }

    fn apply(&self, event: PanelEvent) -> Vec<Effect> {
        self.lock().apply(event)
    }

    fn lock(&self) -> MutexGuard<'_, PanelState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clears the busy flag if a trigger cycle is abandoned before it resolves,
/// and publishes the BUSY to IDLE change since the cycle never will.
struct BusyGuard<'a> {
    state: &'a Mutex<PanelState>,
    event_bus: &'a dyn EventBus,
    armed: bool,
}

impl<'a> BusyGuard<'a> {
    fn new(state: &'a Mutex<PanelState>, event_bus: &'a dyn EventBus) -> Self {
        Self {
            state,
            event_bus,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let released = self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .release();
        if released {
            tracing::warn!("Trigger abandoned before completion, busy flag released");
            self.event_bus.try_emit(CoreEvent::TriggerStateChanged { busy: false });
        }
    }
}
