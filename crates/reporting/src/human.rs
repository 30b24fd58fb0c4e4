use std::fmt;

use crate::{GroupHighlight, GroupSummary, IssueSummary};

pub const SEPARATOR: &str = "------------------------------";
const NULL_PLACEHOLDER: &str = "null";

pub fn render_text(summary: &IssueSummary) -> String {
    summary.to_string()
}

impl fmt::Display for IssueSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total issues found: {}", self.total)?;
        writeln!(f, "{SEPARATOR}")?;
        for group in &self.groups {
            write!(f, "{group}")?;
            writeln!(f, "{SEPARATOR}")?;
        }
        Ok(())
    }
}

impl fmt::Display for GroupSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Issue Type: {}", self.issue_type)?;
        writeln!(f, "Count: {}", self.count)?;
        match &self.highlight {
            GroupHighlight::AffectedTables { total, preview } => {
                writeln!(f, "Tables affected ({total}):")?;
                writeln!(f, "{}...", preview.join(", "))
            }
            GroupHighlight::SampleDetail { detail } => {
                let detail = detail.as_deref().unwrap_or(NULL_PLACEHOLDER);
                writeln!(f, "Sample detail: {detail}")
            }
        }
    }
}
