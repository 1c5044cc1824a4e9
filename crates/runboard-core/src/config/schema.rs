use std::path::PathBuf;

use runboard_api::DEFAULT_PLUGIN_ID;
use serde::{
    Deserialize,
    Serialize,
};

pub(super) const DEFAULT_BASE_URL: &str = "http://127.0.0.1:1337";

pub(super) const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

pub(super) const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

pub(super) const DEFAULT_POOL_SIZE: usize = 10;

pub(super) const DEFAULT_HELP_LINK: &str = "/";

pub(super) const DEFAULT_BIND_ADDR: &str = "127.0.0.1:1337";

pub(super) const DEFAULT_CORS_ALLOW_ALL: bool = true;

pub(super) const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

pub(super) const DEFAULT_GIT_REF: &str = "main";

pub(super) const DEFAULT_PER_PAGE: u8 = 20;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RunboardConfig {
    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub github: GitHubConfig,
}

impl RunboardConfig {
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|p| p.join("runboard"))
            .unwrap_or_else(|| PathBuf::from(".runboard"))
    }

    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }
}

/// Where the panel finds the plugin endpoints and how often it polls them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_plugin_id")]
    pub plugin_id: String,

    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_pool_size")]
    pub pool_size: usize,

    /// Target of the "See more" link on a disabled-dispatch notification
    #[serde(default = "default_help_link")]
    pub help_link: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            plugin_id: default_plugin_id(),
            poll_interval_secs: default_poll_interval(),
            request_timeout_secs: default_request_timeout(),
            pool_size: default_pool_size(),
            help_link: default_help_link(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_plugin_id() -> String {
    DEFAULT_PLUGIN_ID.to_string()
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_pool_size() -> usize {
    DEFAULT_POOL_SIZE
}

fn default_help_link() -> String {
    DEFAULT_HELP_LINK.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_cors_allow_all")]
    pub cors_allow_all: bool,

    #[serde(default = "default_plugin_id")]
    pub plugin_id: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            cors_allow_all: default_cors_allow_all(),
            plugin_id: default_plugin_id(),
        }
    }
}

fn default_bind_addr() -> String {
    DEFAULT_BIND_ADDR.to_string()
}

fn default_cors_allow_all() -> bool {
    DEFAULT_CORS_ALLOW_ALL
}

/// Repository and workflow the server reads runs from and dispatches to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    #[serde(default = "default_github_api_url")]
    pub api_url: String,

    #[serde(default)]
    pub owner: String,

    #[serde(default)]
    pub repo: String,

    /// Workflow file name (`ci.yml`) or numeric id
    #[serde(default)]
    pub workflow_id: String,

    #[serde(rename = "ref", default = "default_git_ref")]
    pub git_ref: String,

    #[serde(default, skip_serializing)]
    pub token: Option<String>,

    #[serde(default = "default_per_page")]
    pub per_page: u8,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: default_github_api_url(),
            owner: String::new(),
            repo: String::new(),
            workflow_id: String::new(),
            git_ref: default_git_ref(),
            token: None,
            per_page: default_per_page(),
        }
    }
}

fn default_github_api_url() -> String {
    DEFAULT_GITHUB_API_URL.to_string()
}

fn default_git_ref() -> String {
    DEFAULT_GIT_REF.to_string()
}

fn default_per_page() -> u8 {
    DEFAULT_PER_PAGE
}
