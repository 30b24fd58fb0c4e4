use crate::IssueSummary;

pub fn render_json(summary: &IssueSummary) -> String {
    serde_json::to_string_pretty(summary).unwrap_or_else(|_| "{}".to_string())
}
