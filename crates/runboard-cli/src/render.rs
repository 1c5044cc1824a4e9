//! Plain-text output for the run table and notifications

use runboard_api::{
    ActionEffect,
    NotificationPayload,
    Severity,
};
use runboard_core::{
    RunRow,
    TABLE_HEADERS,
};

const COLUMN_GAP: &str = "  ";

pub fn render_table(rows: &[RunRow]) -> String {
    if rows.is_empty() {
        return "No workflow runs found.\n".to_string();
    }

    let mut widths = TABLE_HEADERS.map(|h| h.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.cells()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &TABLE_HEADERS, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let rule: Vec<&str> = rule.iter().map(String::as_str).collect();
    push_line(&mut out, &rule, &widths);

    for row in rows {
        push_line(&mut out, &row.cells(), &widths);
    }

    out
}

fn push_line(out: &mut String, cells: &[&str], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join(COLUMN_GAP);
    out.push_str(line.trim_end());
    out.push('\n');
}

pub fn render_notification(notification: &NotificationPayload) -> String {
    let marker = match notification.severity {
        Severity::Success => "[ok]",
        Severity::Danger => "[error]",
    };

    let mut out = format!(
        "{marker} {}: {}\n",
        notification.title, notification.message
    );

    if let Some(action) = &notification.action {
        match &action.effect {
            ActionEffect::RefreshAndDismiss => {
                out.push_str(&format!("  {} (refreshing run list)\n", action.label));
            }
            ActionEffect::OpenLink { href } => {
                out.push_str(&format!("  {}: {href}\n", action.label));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use runboard_api::{
        WorkflowRun,
        WorkflowRunsResponse,
    };
    use runboard_core::render_rows;

    use super::*;

    fn rows() -> Vec<RunRow> {
        let run: WorkflowRun = serde_json::from_value(serde_json::json!({
            "id": 1,
            "name": "CI",
            "status": "queued",
            "run_number": 3,
            "created_at": "2024-05-01T08:00:00Z"
        }))
        .unwrap();
        render_rows(Some(&WorkflowRunsResponse {
            total_count: Some(1),
            workflow_runs: vec![run],
        }))
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(render_table(&[]), "No workflow runs found.\n");
    }

    #[test]
    fn test_table_layout() {
        let table = render_table(&rows());
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Run Number  Workflow Name  Status"));
        assert!(lines[1].starts_with("----------  -------------"));
        assert!(lines[2].starts_with("#3          CI             queued"));
        assert!(lines[2].ends_with("-"));
    }

    #[test]
    fn test_success_notification() {
        let text = render_notification(&NotificationPayload::triggered());
        assert!(text.starts_with("[ok] Successfully Triggered:"));
        assert!(text.contains("Check it out"));
    }

    #[test]
    fn test_disabled_notification_shows_link() {
        let text = render_notification(&NotificationPayload::dispatch_disabled(
            "https://docs.example.com/dispatch",
        ));
        assert!(text.starts_with("[error] Event Error:"));
        assert!(text.contains("See more: https://docs.example.com/dispatch"));
    }

    #[test]
    fn test_unknown_notification_has_no_action_line() {
        let text = render_notification(&NotificationPayload::unknown_failure());
        assert_eq!(text.lines().count(), 1);
    }
}
