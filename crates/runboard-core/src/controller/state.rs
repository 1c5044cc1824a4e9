use runboard_api::{
    ActionEffect,
    NotificationPayload,
};

use super::failure::DispatchFailure;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEvent {
    TriggerRequested,
    TriggerSucceeded,
    TriggerFailed(DispatchFailure),
    NotificationDismissed,
    NotificationActionInvoked,
}

/// Work the caller has to carry out after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Dispatch,
    RequestRefresh,
    OpenLink(String),
}

/// Busy flag and current notification of the trigger panel.
///
/// All changes go through [`PanelState::apply`], so every transition can be
/// exercised without a network or a presenter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelState {
    busy: bool,
    notification: Option<NotificationPayload>,
    help_link: String,
}

impl Default for PanelState {
    fn default() -> Self {
        Self::new("/")
    }
}

impl PanelState {
    pub fn new(help_link: impl Into<String>) -> Self {
        Self {
            busy: false,
            notification: None,
            help_link: help_link.into(),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn notification(&self) -> Option<&NotificationPayload> {
        self.notification.as_ref()
    }

    pub fn apply(&mut self, event: PanelEvent) -> Vec<Effect> {
        match event {
            PanelEvent::TriggerRequested => {
                if self.busy {
                    return Vec::new();
                }
                self.busy = true;
                vec![Effect::Dispatch]
            }
            PanelEvent::TriggerSucceeded => {
                self.busy = false;
                self.notification = Some(NotificationPayload::triggered());
                Vec::new()
            }
            PanelEvent::TriggerFailed(failure) => {
                self.busy = false;
                self.notification = Some(failure.notification(&self.help_link));
                Vec::new()
            }
            PanelEvent::NotificationDismissed => {
                self.notification = None;
                Vec::new()
            }
            PanelEvent::NotificationActionInvoked => {
                let effect = self
                    .notification
                    .as_ref()
                    .and_then(|n| n.action.as_ref())
                    .map(|action| action.effect.clone());

                match effect {
                    Some(ActionEffect::RefreshAndDismiss) => {
                        self.notification = None;
                        vec![Effect::RequestRefresh]
                    }
                    Some(ActionEffect::OpenLink { href }) => vec![Effect::OpenLink(href)],
                    None => Vec::new(),
                }
            }
        }
    }

    /// Clears the busy flag without touching the notification. Used when an
    /// in-flight trigger is abandoned before it resolves.
    pub(crate) fn release(&mut self) -> bool {
        std::mem::replace(&mut self.busy, false)
    }
}
