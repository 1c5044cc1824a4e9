use std::sync::Arc;

use runboard_github::ActionsBackend;

#[derive(Clone)]
pub struct AppState {
    pub backend: Option<Arc<dyn ActionsBackend>>,
    pub config_error: Option<String>,
}

impl AppState {
    pub fn initialized(backend: Arc<dyn ActionsBackend>) -> Self {
        Self {
            backend: Some(backend),
            config_error: None,
        }
    }

    /// The server still starts so `/health` can report what is wrong
    pub fn config_error(error: String) -> Self {
        Self {
            backend: None,
            config_error: Some(error),
        }
    }
}
