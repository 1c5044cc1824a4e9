//! Settings for the GitHub backend

use secrecy::SecretString;

use crate::error::{
    GitHubError,
    GitHubResult,
};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

pub const DEFAULT_PER_PAGE: u8 = 20;

#[derive(Debug)]
pub struct GitHubSettings {
    pub api_url: String,
    pub owner: String,
    pub repo: String,
    /// Workflow file name (`deploy.yml`) or numeric id
    pub workflow_id: String,
    pub git_ref: String,
    pub token: SecretString,
    pub per_page: u8,
}

impl GitHubSettings {
    /// Builds settings for one workflow.
    ///
    /// `repository` is either `owner/repo`, or just the owner when `repo` is
    /// given separately.
    pub fn new(
        api_url: &str, repository: &str, repo: &str, workflow_id: &str, git_ref: &str,
        token: SecretString,
    ) -> GitHubResult<Self> {
        let (owner, repo) = match parse_repo(repository) {
            Some(parts) => parts,
            None if !repository.trim().is_empty() && !repo.trim().is_empty() => {
                (repository.trim().to_string(), repo.trim().to_string())
            }
            None => {
                return Err(GitHubError::Config(format!(
                    "Invalid repository '{repository}', expected owner/repo"
                )))
            }
        };

        let workflow_id = workflow_id.trim();
        if workflow_id.is_empty() {
            return Err(GitHubError::Config("Missing workflow id".to_string()));
        }

        let git_ref = match git_ref.trim() {
            "" => "main",
            r => r,
        };

        Ok(Self {
            api_url: normalize_api_url(api_url),
            owner,
            repo,
            workflow_id: workflow_id.to_string(),
            git_ref: git_ref.to_string(),
            token,
            per_page: DEFAULT_PER_PAGE,
        })
    }

    pub fn with_per_page(mut self, per_page: u8) -> Self {
        self.per_page = per_page.clamp(1, 100);
        self
    }

    /// `owner/repo`
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    pub fn runs_route(&self) -> String {
        format!(
            "/repos/{}/{}/actions/workflows/{}/runs",
            self.owner, self.repo, self.workflow_id
        )
    }

    pub fn dispatch_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/actions/workflows/{}/dispatches",
            self.api_url, self.owner, self.repo, self.workflow_id
        )
    }
}

/// Parses a repository string into owner and name
///
/// # Example
///
/// ```ignore
/// let (owner, name) = parse_repo("owner/repo").unwrap();
/// assert_eq!(owner, "owner");
/// assert_eq!(name, "repo");
/// ```
pub fn parse_repo(repo: &str) -> Option<(String, String)> {
    let parts: Vec<&str> = repo.trim().split('/').collect();
    match parts.as_slice() {
        [owner, name] if !owner.is_empty() && !name.is_empty() => {
            Some((owner.to_string(), name.to_string()))
        }
        _ => None,
    }
}

/// Maps a configured URL to the REST API root.
///
/// `github.com` goes to `api.github.com`; Enterprise hosts get `/api/v3`
/// unless the URL already points at an API root.
pub fn normalize_api_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return DEFAULT_API_URL.to_string();
    }

    if trimmed.contains("api.github.com") || trimmed.ends_with("/api/v3") {
        trimmed.to_string()
    } else if trimmed.ends_with("://github.com") {
        DEFAULT_API_URL.to_string()
    } else if trimmed.starts_with("http://127.0.0.1") || trimmed.starts_with("http://localhost") {
        trimmed.to_string()
    } else {
        format!("{trimmed}/api/v3")
    }
}
