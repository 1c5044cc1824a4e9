//! GitHub Actions backend for the Runboard server
//!
//! Reads the run list for one workflow and sends `workflow_dispatch` events
//! to it.
//!
//! ## Modules
//!
//! - `client` - octocrab reads and the dispatch POST
//! - `config` - repository and API URL helpers
//! - `error` - failure classification by GitHub status code

pub mod client;
pub mod config;
pub mod error;

use async_trait::async_trait;
pub use client::GitHubActionsClient;
pub use config::GitHubSettings;
pub use error::{
    GitHubError,
    GitHubResult,
};
use runboard_api::WorkflowRunsResponse;

/// What the server needs from a CI provider
#[async_trait]
pub trait ActionsBackend: Send + Sync {
    async fn list_runs(&self) -> GitHubResult<WorkflowRunsResponse>;

    /// Sends one dispatch event. Never retried.
    async fn dispatch(&self) -> GitHubResult<()>;
}
