pub mod endpoints;
pub mod error;
pub mod notification;
pub mod types;
pub mod utils;

pub use endpoints::{
    Endpoints,
    DEFAULT_PLUGIN_ID,
    HISTORY_PATH,
    TRIGGER_PATH,
};
pub use error::{
    PanelError,
    PanelResult,
};
pub use notification::{
    ActionEffect,
    NotificationAction,
    NotificationPayload,
    Severity,
};
pub use types::{
    ErrorBody,
    ErrorEnvelope,
    ErrorName,
    WorkflowRun,
    WorkflowRunsResponse,
};
pub use utils::RetryPolicy;
