pub mod client;
pub mod config;
pub mod controller;
pub mod event;
pub mod logging;
pub mod refresh;
pub mod rows;

use std::sync::Arc;
use std::time::Duration;

pub use client::{
    build_http_client,
    PanelClient,
};
pub use config::{
    ClientConfig,
    ConfigLoader,
    RunboardConfig,
};
pub use controller::{
    DispatchFailure,
    DispatchTarget,
    Effect,
    PanelEvent,
    PanelState,
    TriggerController,
    TriggerOutcome,
};
pub use event::{
    BroadcastEventBus,
    CoreEvent,
    EventBus,
};
pub use refresh::{
    HistorySnapshot,
    RefreshSource,
    RunHistoryFetcher,
    RunHistorySource,
};
pub use rows::{
    render_rows,
    RunRow,
    TABLE_HEADERS,
};

/// Everything a panel frontend needs, wired against one plugin server
pub struct PanelContext {
    pub event_bus: Arc<dyn EventBus>,

    pub client: Arc<PanelClient>,

    pub history: Arc<RunHistorySource>,

    pub controller: Arc<TriggerController>,
}

impl PanelContext {
    pub fn new(config: &RunboardConfig, event_bus: Arc<dyn EventBus>) -> anyhow::Result<Self> {
        let client = Arc::new(PanelClient::new(&config.client)?);
        Ok(Self::with_client(config, client, event_bus))
    }

    pub fn with_client(
        config: &RunboardConfig, client: Arc<PanelClient>, event_bus: Arc<dyn EventBus>,
    ) -> Self {
        let history = Arc::new(RunHistorySource::new(
            Arc::clone(&client) as Arc<dyn RunHistoryFetcher>,
            Arc::clone(&event_bus),
            Duration::from_secs(config.client.poll_interval_secs),
        ));
        let controller = Arc::new(TriggerController::new(
            Arc::clone(&client) as Arc<dyn DispatchTarget>,
            Arc::clone(&history) as Arc<dyn RefreshSource>,
            Arc::clone(&event_bus),
            config.client.help_link.clone(),
        ));

        tracing::debug!(
            history = %client.endpoints().history(),
            trigger = %client.endpoints().trigger(),
            "Panel context ready"
        );

        Self {
            event_bus,
            client,
            history,
            controller,
        }
    }

    pub async fn start_polling(&self) {
        self.history.start().await;
    }

    pub async fn shutdown(&self) {
        self.history.stop().await;
    }
}
