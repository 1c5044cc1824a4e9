//! Table rows for the run history view

use chrono::{
    DateTime,
    Utc,
};
use runboard_api::{
    WorkflowRun,
    WorkflowRunsResponse,
};
use serde::Serialize;

pub const TABLE_HEADERS: [&str; 5] = [
    "Run Number",
    "Workflow Name",
    "Status",
    "Creation Date",
    "Duration",
];

const PLACEHOLDER: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunRow {
    pub id: u64,
    pub run_number: String,
    pub workflow_name: String,
    pub status: String,
    pub created: String,
    pub duration: String,
    pub url: Option<String>,
    pub disabled: bool,
}

impl RunRow {
    pub fn cells(&self) -> [&str; 5] {
        [
            &self.run_number,
            &self.workflow_name,
            &self.status,
            &self.created,
            &self.duration,
        ]
    }
}

impl From<&WorkflowRun> for RunRow {
    fn from(run: &WorkflowRun) -> Self {
        Self {
            id: run.id,
            run_number: run
                .run_number
                .map(|n| format!("#{n}"))
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            workflow_name: run
                .name
                .clone()
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            status: status_label(run),
            created: run
                .created_at
                .map(format_timestamp)
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            duration: compute_duration(run.run_started_at.or(run.created_at), run.updated_at),
            url: run.html_url.clone(),
            disabled: run.disabled.unwrap_or(false),
        }
    }
}

/// One row per run, in the order the endpoint returned them. A list that has
/// not been fetched yet renders as no rows.
pub fn render_rows(runs: Option<&WorkflowRunsResponse>) -> Vec<RunRow> {
    runs.map(|r| r.workflow_runs.iter().map(RunRow::from).collect())
        .unwrap_or_default()
}

/// Conclusion for finished runs, live status otherwise
pub fn status_label(run: &WorkflowRun) -> String {
    let label = if run.is_completed() {
        run.conclusion.as_deref().or(run.status.as_deref())
    } else {
        run.status.as_deref()
    };

    label
        .map(|l| l.replace('_', " "))
        .unwrap_or_else(|| "unknown".to_string())
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

/// Format a duration in seconds into a human-readable string (e.g. "2m 5s").
pub fn format_duration(secs: i64) -> String {
    let secs = secs.max(0);
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}

pub fn compute_duration(
    started_at: Option<DateTime<Utc>>, ended_at: Option<DateTime<Utc>>,
) -> String {
    match (started_at, ended_at) {
        (Some(start), Some(end)) => {
            format_duration(end.signed_duration_since(start).num_seconds())
        }
        _ => PLACEHOLDER.to_string(),
    }
}
