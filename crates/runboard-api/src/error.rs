use thiserror::Error;

/// Errors shared by the panel client, the refresh source and the GitHub backend
#[derive(Error, Debug)]
pub enum PanelError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Unexpected HTTP status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PanelError {
    /// HTTP status carried by the error, if the remote side answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            PanelError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type PanelResult<T> = Result<T, PanelError>;

impl From<serde_json::Error> for PanelError {
    fn from(err: serde_json::Error) -> Self {
        PanelError::SerializationError(err.to_string())
    }
}
