use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use runboard_api::{
    Endpoints,
    ErrorEnvelope,
    PanelError,
    PanelResult,
    WorkflowRunsResponse,
};

use crate::config::ClientConfig;
use crate::controller::{
    DispatchFailure,
    DispatchTarget,
};
use crate::refresh::RunHistoryFetcher;

pub fn build_http_client(config: &ClientConfig) -> PanelResult<Client> {
    Client::builder()
        .pool_max_idle_per_host(config.pool_size)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(concat!("runboard/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| PanelError::Internal(format!("Failed to create HTTP client: {e}")))
}

/// Client for the two plugin endpoints
#[derive(Clone)]
pub struct PanelClient {
    http: Client,
    endpoints: Endpoints,
}

impl PanelClient {
    pub fn new(config: &ClientConfig) -> PanelResult<Self> {
        let http = build_http_client(config)?;
        Ok(Self::with_client(
            http,
            Endpoints::new(&config.base_url, &config.plugin_id),
        ))
    }

    pub fn with_client(http: Client, endpoints: Endpoints) -> Self {
        Self { http, endpoints }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub async fn list_runs(&self) -> PanelResult<WorkflowRunsResponse> {
        let url = self.endpoints.history();
        tracing::debug!(url = %url, "Fetching run history");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| PanelError::NetworkError(format!("Failed to fetch run history: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let message = ErrorEnvelope::parse(&body)
                .and_then(|envelope| envelope.error)
                .and_then(|error| error.message)
                .unwrap_or_else(|| String::from_utf8_lossy(&body).into_owned());

            return Err(match status.as_u16() {
                401 | 403 => PanelError::AuthenticationFailed(message),
                code => PanelError::UnexpectedStatus {
                    status: code,
                    body: message,
                },
            });
        }

        response
            .json::<WorkflowRunsResponse>()
            .await
            .map_err(|e| PanelError::SerializationError(format!("Invalid run history: {e}")))
    }

    /// Sends one POST to the trigger endpoint with an empty body.
    ///
    /// Any 2xx counts as success and the body is not read.
    pub async fn trigger(&self) -> Result<(), DispatchFailure> {
        let url = self.endpoints.trigger();
        tracing::debug!(url = %url, "Posting dispatch request");

        let response = match self.http.post(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(error = %e, "Dispatch request did not get a response");
                return Err(DispatchFailure::transport(e.to_string()));
            }
        };

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.bytes().await.unwrap_or_default();
        Err(DispatchFailure::from_response(status.as_u16(), &body))
    }
}

#[async_trait]
impl DispatchTarget for PanelClient {
    async fn dispatch(&self) -> Result<(), DispatchFailure> {
        self.trigger().await
    }
}

#[async_trait]
impl RunHistoryFetcher for PanelClient {
    async fn fetch_runs(&self) -> PanelResult<WorkflowRunsResponse> {
        self.list_runs().await
    }
}
