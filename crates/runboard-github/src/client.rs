use std::time::Duration;

use async_trait::async_trait;
use octocrab::service::middleware::retry::RetryConfig;
use octocrab::Octocrab;
use runboard_api::{
    PanelError,
    RetryPolicy,
    WorkflowRunsResponse,
};
use secrecy::ExposeSecret;
use serde::Serialize;
use tracing::debug;

use crate::config::GitHubSettings;
use crate::error::{
    GitHubError,
    GitHubResult,
};
use crate::ActionsBackend;

const API_TIMEOUT_SECS: u64 = 30;

const USER_AGENT: &str = "runboard";

#[derive(Serialize)]
struct RunsQuery {
    per_page: u8,
}

#[derive(Serialize)]
struct DispatchBody<'a> {
    #[serde(rename = "ref")]
    git_ref: &'a str,
}

pub struct GitHubActionsClient {
    octocrab: Octocrab,
    http: reqwest::Client,
    settings: GitHubSettings,
    retry_policy: RetryPolicy,
}

impl GitHubActionsClient {
    pub fn new(settings: GitHubSettings) -> GitHubResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(API_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GitHubError::Config(format!("Failed to build HTTP client: {e}")))?;

        Self::with_http(settings, http)
    }

    /// Reads are retried by `retry_policy` only; octocrab's own retry layer is
    /// switched off so a flaky connection is not retried twice over.
    pub fn with_http(settings: GitHubSettings, http: reqwest::Client) -> GitHubResult<Self> {
        let octocrab = Octocrab::builder()
            .add_retry_config(RetryConfig::None)
            .base_uri(settings.api_url.as_str())
            .map_err(|e| GitHubError::Config(format!("Invalid GitHub API URL: {e}")))?
            .personal_token(settings.token.expose_secret().to_string())
            .build()
            .map_err(|e| GitHubError::Config(format!("Failed to build GitHub client: {e}")))?;

        Ok(Self {
            octocrab,
            http,
            settings,
            retry_policy: RetryPolicy::default(),
        })
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// Latest runs of the configured workflow, newest first
    pub async fn fetch_runs(&self) -> GitHubResult<WorkflowRunsResponse> {
        let route = self.settings.runs_route();
        let query = RunsQuery {
            per_page: self.settings.per_page,
        };

        self.retry_policy
            .retry(|| async {
                debug!(route = %route, per_page = query.per_page, "Fetching workflow runs");

                self.octocrab
                    .get::<WorkflowRunsResponse, _, _>(&route, Some(&query))
                    .await
                    .map_err(|e| PanelError::from(GitHubError::from(e)))
            })
            .await
            .map_err(GitHubError::from)
    }

    /// Sends a `workflow_dispatch` event for the configured ref.
    ///
    /// GitHub answers 204 with no body on success.
    pub async fn send_dispatch(&self) -> GitHubResult<()> {
        let url = self.settings.dispatch_url();
        let body = DispatchBody {
            git_ref: &self.settings.git_ref,
        };

        debug!(
            repo = %self.settings.slug(),
            workflow = %self.settings.workflow_id,
            git_ref = %self.settings.git_ref,
            "Sending workflow dispatch"
        );

        let response = self
            .http
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.settings.token.expose_secret()),
            )
            .header("Accept", "application/vnd.github.v3+json")
            .json(&body)
            .send()
            .await
            .map_err(|e| GitHubError::Transport(format!("Failed to trigger workflow: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let error_text = response.text().await.unwrap_or_default();
        Err(GitHubError::from_response(status.as_u16(), &error_text))
    }
}

#[async_trait]
impl ActionsBackend for GitHubActionsClient {
    async fn list_runs(&self) -> GitHubResult<WorkflowRunsResponse> {
        self.fetch_runs().await
    }

    async fn dispatch(&self) -> GitHubResult<()> {
        self.send_dispatch().await
    }
}
