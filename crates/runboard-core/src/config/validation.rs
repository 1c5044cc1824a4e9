use super::schema::{
    ClientConfig,
    GitHubConfig,
    RunboardConfig,
    ServerConfig,
};

#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigError>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(ConfigError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn summary(&self) -> String {
        if self.errors.is_empty() {
            "Configuration is valid".to_string()
        } else {
            self.errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Checks what the panel client needs
pub fn validate_client(config: &RunboardConfig) -> ValidationResult {
    let mut result = ValidationResult::new();
    check_client(&config.client, &mut result);
    result
}

/// Checks what the server needs, including the GitHub section
pub fn validate_server(config: &RunboardConfig) -> ValidationResult {
    let mut result = ValidationResult::new();
    check_server(&config.server, &mut result);
    check_github(&config.github, &mut result);
    result
}

fn check_client(client: &ClientConfig, result: &mut ValidationResult) {
    if !is_http_url(&client.base_url) {
        result.add_error(
            "client.base_url",
            format!("must be an http(s) URL, got '{}'", client.base_url),
        );
    }
    if client.poll_interval_secs == 0 {
        result.add_error("client.poll_interval_secs", "must be at least 1");
    }
    if client.request_timeout_secs == 0 {
        result.add_error("client.request_timeout_secs", "must be at least 1");
    }
}

fn check_server(server: &ServerConfig, result: &mut ValidationResult) {
    if server.bind_addr.parse::<std::net::SocketAddr>().is_err() {
        result.add_error(
            "server.bind_addr",
            format!("invalid socket address '{}'", server.bind_addr),
        );
    }
}

fn check_github(github: &GitHubConfig, result: &mut ValidationResult) {
    if !is_http_url(&github.api_url) {
        result.add_error("github.api_url", "must be an http(s) URL");
    }
    for (field, value) in [
        ("github.owner", &github.owner),
        ("github.repo", &github.repo),
        ("github.workflow_id", &github.workflow_id),
        ("github.ref", &github.git_ref),
    ] {
        if value.trim().is_empty() {
            result.add_error(field, "is required");
        }
    }
    if github.token.as_deref().map_or(true, |t| t.trim().is_empty()) {
        result.add_error("github.token", "is required (set GITHUB_TOKEN)");
    }
    if github.per_page == 0 || github.per_page > 100 {
        result.add_error("github.per_page", "must be between 1 and 100");
    }
}

fn is_http_url(value: &str) -> bool {
    let value = value.trim();
    value.starts_with("http://") || value.starts_with("https://")
}
