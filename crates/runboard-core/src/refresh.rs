use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{
    DateTime,
    Utc,
};
use runboard_api::{
    PanelResult,
    WorkflowRun,
    WorkflowRunsResponse,
};
use tokio::sync::{
    Notify,
    RwLock,
};
use tokio::time::{
    interval,
    MissedTickBehavior,
};

use crate::event::{
    CoreEvent,
    EventBus,
};

/// Something that can be asked to re-fetch the run list
pub trait RefreshSource: Send + Sync {
    fn request_refresh(&self);
}

#[async_trait]
pub trait RunHistoryFetcher: Send + Sync {
    async fn fetch_runs(&self) -> PanelResult<WorkflowRunsResponse>;
}

#[derive(Debug, Clone, Default)]
pub struct HistorySnapshot {
    /// `None` until the first successful fetch
    pub runs: Option<WorkflowRunsResponse>,
    pub last_error: Option<String>,
    pub is_loading: bool,
    pub last_fetched: Option<DateTime<Utc>>,
}

/// Polls the history endpoint and keeps the latest run list.
///
/// A refresh request wakes the poller early and restarts its interval.
pub struct RunHistorySource {
    fetcher: Arc<dyn RunHistoryFetcher>,
    event_bus: Arc<dyn EventBus>,
    snapshot: Arc<RwLock<HistorySnapshot>>,
    wake: Arc<Notify>,
    /// Stop signal of the live polling task, `None` when stopped. Each task
    /// owns its own signal so a stale task never outlives a restart.
    stop_signal: RwLock<Option<Arc<Notify>>>,
    poll_interval: Duration,
}

impl RunHistorySource {
    pub fn new(
        fetcher: Arc<dyn RunHistoryFetcher>, event_bus: Arc<dyn EventBus>, poll_interval: Duration,
    ) -> Self {
        Self {
            fetcher,
            event_bus,
            snapshot: Arc::new(RwLock::new(HistorySnapshot::default())),
            wake: Arc::new(Notify::new()),
            stop_signal: RwLock::new(None),
            poll_interval: poll_interval.max(Duration::from_secs(1)),
        }
    }

    pub async fn snapshot(&self) -> HistorySnapshot {
        self.snapshot.read().await.clone()
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Fetches once, outside the polling schedule
    pub async fn fetch_now(&self) -> PanelResult<WorkflowRunsResponse> {
        Self::refresh_once(&self.fetcher, &self.event_bus, &self.snapshot).await
    }

    pub async fn start(&self) {
        let mut stop_signal = self.stop_signal.write().await;
        if stop_signal.is_some() {
            return;
        }
        let stopped = Arc::new(Notify::new());
        *stop_signal = Some(Arc::clone(&stopped));
        drop(stop_signal);

        let fetcher = Arc::clone(&self.fetcher);
        let event_bus = Arc::clone(&self.event_bus);
        let snapshot = Arc::clone(&self.snapshot);
        let wake = Arc::clone(&self.wake);
        let poll_interval = self.poll_interval;

        tokio::spawn(async move {
            let mut ticker = interval(poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            tracing::info!(
                interval_secs = poll_interval.as_secs(),
                "Run history polling started"
            );

            loop {
                tokio::select! {
                    biased;
                    _ = stopped.notified() => break,
                    _ = ticker.tick() => {}
                    _ = wake.notified() => {
                        ticker.reset();
                    }
                }

                let _ = Self::refresh_once(&fetcher, &event_bus, &snapshot).await;
            }

            tracing::info!("Run history polling stopped");
        });
    }

    pub async fn stop(&self) {
        if let Some(stopped) = self.stop_signal.write().await.take() {
            stopped.notify_one();
        }
    }

    pub async fn is_running(&self) -> bool {
        self.stop_signal.read().await.is_some()
    }

    async fn refresh_once(
        fetcher: &Arc<dyn RunHistoryFetcher>, event_bus: &Arc<dyn EventBus>,
        snapshot: &Arc<RwLock<HistorySnapshot>>,
    ) -> PanelResult<WorkflowRunsResponse> {
        snapshot.write().await.is_loading = true;

        let result = fetcher.fetch_runs().await;

        let mut current = snapshot.write().await;
        current.is_loading = false;

        match &result {
            Ok(runs) => {
                let changed = match &current.runs {
                    Some(old) => Self::has_changes(&old.workflow_runs, &runs.workflow_runs),
                    None => true,
                };
                if changed {
                    tracing::debug!(count = runs.len(), "Run history changed");
                }

                current.runs = Some(runs.clone());
                current.last_error = None;
                let now = Utc::now();
                current.last_fetched = Some(now);
                drop(current);

                event_bus
                    .emit(CoreEvent::RunsUpdated {
                        count: runs.len(),
                        changed,
                        timestamp: now.timestamp_millis(),
                    })
                    .await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch run history");
                current.last_error = Some(e.to_string());
                drop(current);

                event_bus
                    .emit(CoreEvent::RefreshError {
                        error: e.to_string(),
                    })
                    .await;
            }
        }

        result
    }

    fn has_changes(old: &[WorkflowRun], new: &[WorkflowRun]) -> bool {
        if old.len() != new.len() {
            return true;
        }

        for new_run in new {
            match old.iter().find(|r| r.id == new_run.id) {
                Some(old_run) => {
                    if old_run.status != new_run.status
                        || old_run.conclusion != new_run.conclusion
                        || old_run.updated_at != new_run.updated_at
                    {
                        return true;
                    }
                }
                None => return true,
            }
        }

        false
    }
}

impl RefreshSource for RunHistorySource {
    fn request_refresh(&self) {
        tracing::debug!("Run history refresh requested");
        self.wake.notify_one();
    }
}
