mod error;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use runboard_core::config::{
    validate_server,
    ConfigLoader,
    GitHubConfig,
    RunboardConfig,
};
use runboard_github::{
    GitHubActionsClient,
    GitHubSettings,
};
use secrecy::SecretString;
use tower_http::cors::{
    Any,
    CorsLayer,
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

struct ApiServerConfig {
    bind_addr: SocketAddr,
    cors_allow_all: bool,
    plugin_id: String,
}

impl ApiServerConfig {
    fn from_config(config: &RunboardConfig) -> anyhow::Result<Self> {
        let bind_addr = config
            .server
            .bind_addr
            .parse()
            .with_context(|| format!("Invalid bind address '{}'", config.server.bind_addr))?;

        Ok(Self {
            bind_addr,
            cors_allow_all: config.server.cors_allow_all,
            plugin_id: config.server.plugin_id.clone(),
        })
    }
}

fn github_backend(github: &GitHubConfig) -> anyhow::Result<GitHubActionsClient> {
    let token = SecretString::from(github.token.clone().unwrap_or_default());
    let settings = GitHubSettings::new(
        &github.api_url,
        &github.owner,
        &github.repo,
        &github.workflow_id,
        &github.git_ref,
        token,
    )?
    .with_per_page(github.per_page);

    tracing::info!(
        repo = %settings.slug(),
        workflow = %settings.workflow_id,
        git_ref = %settings.git_ref,
        api_url = %settings.api_url,
        "GitHub backend configured"
    );

    Ok(GitHubActionsClient::new(settings)?)
}

fn app_state(config: &RunboardConfig) -> AppState {
    let validation = validate_server(config);
    if !validation.is_ok() {
        let error_msg = validation.summary();
        tracing::error!(error = %error_msg, "Invalid configuration");
        return AppState::config_error(error_msg);
    }

    match github_backend(&config.github) {
        Ok(client) => AppState::initialized(Arc::new(client)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize GitHub backend");
            AppState::config_error(e.to_string())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    runboard_core::logging::init();

    let config_path = ConfigLoader::discover_config_path();
    let config = ConfigLoader::load_or_default(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    let api_config = ApiServerConfig::from_config(&config)?;

    tracing::info!("Starting Runboard plugin server");
    tracing::info!(
        bind_addr = %api_config.bind_addr,
        plugin_id = %api_config.plugin_id,
        "Server configuration"
    );

    let app = routes::api_router(&api_config.plugin_id)
        .layer(TraceLayer::new_for_http())
        .layer(if api_config.cors_allow_all {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            CorsLayer::new()
        })
        .with_state(app_state(&config));

    tracing::info!("Listening on {}", api_config.bind_addr);
    let listener = tokio::net::TcpListener::bind(api_config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
