use runboard_api::{
    ErrorName,
    PanelError,
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GitHubError {
    /// GitHub answered with a non-2xx status
    #[error("GitHub returned HTTP {status}: {message}")]
    Rejected { status: u16, message: String },

    /// No response at all: connect error, timeout, reset
    #[error("GitHub request failed: {0}")]
    Transport(String),

    #[error("Invalid GitHub response: {0}")]
    Decode(String),

    #[error("Invalid GitHub configuration: {0}")]
    Config(String),
}

pub type GitHubResult<T> = Result<T, GitHubError>;

impl GitHubError {
    /// Builds a `Rejected` from a GitHub error body (`{"message": ...}`),
    /// falling back to the raw text.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    format!("HTTP {status}")
                } else {
                    body.trim().to_string()
                }
            });

        GitHubError::Rejected { status, message }
    }

    /// Status the server answers the panel with
    pub fn http_status(&self) -> u16 {
        match self {
            GitHubError::Rejected { status, .. } => match *status {
                400 | 401 | 403 | 404 | 422 => *status,
                _ => 500,
            },
            GitHubError::Transport(_) | GitHubError::Decode(_) => 502,
            GitHubError::Config(_) => 500,
        }
    }

    pub fn error_name(&self) -> ErrorName {
        ErrorName::from_status(self.http_status())
    }

    pub fn message(&self) -> String {
        match self {
            GitHubError::Rejected { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<GitHubError> for PanelError {
    fn from(err: GitHubError) -> Self {
        match err {
            GitHubError::Rejected { status, message } => PanelError::UnexpectedStatus {
                status,
                body: message,
            },
            GitHubError::Transport(e) => PanelError::NetworkError(e),
            GitHubError::Decode(e) => PanelError::SerializationError(e),
            GitHubError::Config(e) => PanelError::InvalidConfig(e),
        }
    }
}

impl From<PanelError> for GitHubError {
    fn from(err: PanelError) -> Self {
        match err {
            PanelError::UnexpectedStatus { status, body } => GitHubError::Rejected {
                status,
                message: body,
            },
            PanelError::AuthenticationFailed(message) => GitHubError::Rejected {
                status: 401,
                message,
            },
            PanelError::SerializationError(e) => GitHubError::Decode(e),
            PanelError::InvalidConfig(e) => GitHubError::Config(e),
            PanelError::NetworkError(e) | PanelError::ApiError(e) | PanelError::Internal(e) => {
                GitHubError::Transport(e)
            }
        }
    }
}

impl From<octocrab::Error> for GitHubError {
    fn from(err: octocrab::Error) -> Self {
        match err {
            octocrab::Error::GitHub { source, .. } => GitHubError::Rejected {
                status: source.status_code.as_u16(),
                message: source.message.clone(),
            },
            octocrab::Error::Serde { source, .. } => GitHubError::Decode(source.to_string()),
            octocrab::Error::Json { source, .. } => GitHubError::Decode(source.to_string()),
            other => GitHubError::Transport(other.to_string()),
        }
    }
}
