mod actions;
pub mod health;

use axum::{
    routing::{
        get,
        post,
    },
    Router,
};
use runboard_api::{
    Endpoints,
    HISTORY_PATH,
    TRIGGER_PATH,
};

use crate::state::AppState;

/// Routes for one plugin namespace, e.g. `/github-actions/github-actions-history`
pub fn api_router(plugin_id: &str) -> Router<AppState> {
    let base = Endpoints::new("", plugin_id);
    let base = base.base();

    Router::new()
        .route("/health", get(health::health_check))
        .route(&format!("{base}/{HISTORY_PATH}"), get(actions::list_runs))
        .route(&format!("{base}/{TRIGGER_PATH}"), post(actions::trigger_run))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{
        AtomicUsize,
        Ordering,
    };
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{
            Request,
            StatusCode,
        },
    };
    use runboard_api::{
        ErrorEnvelope,
        WorkflowRunsResponse,
    };
    use runboard_github::{
        ActionsBackend,
        GitHubError,
        GitHubResult,
    };
    use tower::ServiceExt;

    use super::*;

    struct StubBackend {
        dispatch_result: GitHubResult<()>,
        dispatches: AtomicUsize,
    }

    impl StubBackend {
        fn new(dispatch_result: GitHubResult<()>) -> Arc<Self> {
            Arc::new(Self {
                dispatch_result,
                dispatches: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ActionsBackend for StubBackend {
        async fn list_runs(&self) -> GitHubResult<WorkflowRunsResponse> {
            Ok(serde_json::from_value(serde_json::json!({
                "total_count": 1,
                "workflow_runs": [
                    { "id": 5, "name": "CI", "status": "queued", "head_branch": "main" }
                ]
            }))
            .unwrap())
        }

        async fn dispatch(&self) -> GitHubResult<()> {
            self.dispatches.fetch_add(1, Ordering::SeqCst);
            self.dispatch_result.clone()
        }
    }

    fn app(state: AppState) -> Router {
        api_router("github-actions").with_state(state)
    }

    async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    fn post_request(uri: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_trigger_answers_created_with_empty_body() {
        let backend = StubBackend::new(Ok(()));
        let response = app(AppState::initialized(backend.clone()))
            .oneshot(post_request("/github-actions/github-actions-trigger"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(body_bytes(response).await.is_empty());
        assert_eq!(backend.dispatches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_disabled_dispatch_renders_envelope() {
        let backend = StubBackend::new(Err(GitHubError::Rejected {
            status: 422,
            message: "Workflow does not have 'workflow_dispatch' trigger".to_string(),
        }));
        let response = app(AppState::initialized(backend))
            .oneshot(post_request("/github-actions/github-actions-trigger"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert!(body["data"].is_null());
        assert_eq!(body["error"]["status"], 422);
        assert_eq!(body["error"]["name"], "UnprocessableEntityError");

        let envelope = ErrorEnvelope::parse(&serde_json::to_vec(&body).unwrap()).unwrap();
        assert!(envelope.error.unwrap().is_dispatch_disabled());
    }

    #[tokio::test]
    async fn test_unexpected_github_status_is_application_error() {
        let backend = StubBackend::new(Err(GitHubError::Rejected {
            status: 409,
            message: "conflict".to_string(),
        }));
        let response = app(AppState::initialized(backend))
            .oneshot(post_request("/github-actions/github-actions-trigger"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body["error"]["name"], "ApplicationError");
        assert_eq!(body["error"]["message"], "conflict");
    }

    #[tokio::test]
    async fn test_history_forwards_runs() {
        let response = app(AppState::initialized(StubBackend::new(Ok(()))))
            .oneshot(get_request("/github-actions/github-actions-history"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let runs: WorkflowRunsResponse =
            serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs.workflow_runs[0].extra["head_branch"], "main");
    }

    #[tokio::test]
    async fn test_unconfigured_server_reports_error() {
        let state = AppState::config_error("github.token: is required".to_string());

        let response = app(state.clone())
            .oneshot(get_request("/github-actions/github-actions-history"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = app(state).oneshot(get_request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let health: health::HealthResponse =
            serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(health.status, "config_error");
        assert_eq!(
            health.config_error.as_deref(),
            Some("github.token: is required")
        );
    }

    #[tokio::test]
    async fn test_wrong_method_is_rejected() {
        let response = app(AppState::initialized(StubBackend::new(Ok(()))))
            .oneshot(get_request("/github-actions/github-actions-trigger"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn test_empty_plugin_id_mounts_at_root() {
        let _router: Router = api_router("").with_state(AppState::config_error(String::new()));
    }
}
