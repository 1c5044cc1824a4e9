use axum::{
    http::StatusCode,
    response::{
        IntoResponse,
        Response,
    },
    Json,
};
use runboard_api::{
    ErrorBody,
    ErrorEnvelope,
};
use runboard_github::GitHubError;

/// Failed plugin request, rendered as `{ "data": null, "error": { ... } }`
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: ErrorBody,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            error: ErrorBody::new(status.as_u16(), message),
        }
    }

    pub fn not_configured(reason: &str) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            format!("Runboard server is not configured: {reason}"),
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorEnvelope::new(self.error))).into_response()
    }
}

impl From<GitHubError> for AppError {
    fn from(err: GitHubError) -> Self {
        let status = StatusCode::from_u16(err.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self::new(status, err.message())
    }
}

pub type ApiResult<T> = Result<T, AppError>;
