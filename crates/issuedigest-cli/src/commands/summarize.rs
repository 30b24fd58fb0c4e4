use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;

use issuedigest_core::config::{Config, SummaryConfig};
use issuedigest_core::issue::IssueCollection;
use reporting::json::render_json;
use reporting::IssueSummary;

pub fn execute(config_path: Option<PathBuf>, input: Option<PathBuf>, json: bool) -> Result<()> {
    let config = Config::load_effective(config_path.as_deref())?;
    let input = input
        .or(config.report.input)
        .context("no report given (pass --input or set report.input in the config)")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_summary(&mut out, &input, json, &config.summary)
}

/// Load failures are reported as a single line on `out` and are not propagated.
pub fn write_summary<W: Write>(
    out: &mut W,
    input: &Path,
    json: bool,
    options: &SummaryConfig,
) -> Result<()> {
    let issues = match IssueCollection::load(input) {
        Ok(issues) => issues,
        Err(err) => {
            debug!("report load failed: {err:?}");
            writeln!(out, "Error reading or parsing file: {err}").context("write error line")?;
            return Ok(());
        }
    };

    let summary = IssueSummary::from_collection(&issues, options);
    if json {
        writeln!(out, "{}", render_json(&summary)).context("write JSON summary")?;
    } else {
        write!(out, "{}", summary.human_summary()).context("write summary")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn run(input: &Path, json: bool) -> String {
        let mut out = Vec::new();
        write_summary(&mut out, input, json, &SummaryConfig::default()).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_summary_for_valid_report() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("issues.json");
        fs::write(
            &input,
            r#"[{"name":"a","detail":"x"},{"name":"a","detail":"y"},{"name":"b","detail":"z"}]"#,
        )
        .unwrap();

        let output = run(&input, false);

        assert!(output.starts_with("Total issues found: 3\n"));
        assert!(output.contains("Issue Type: a\nCount: 2\nSample detail: x\n"));
        assert!(output.contains("Issue Type: b\nCount: 1\nSample detail: z\n"));
    }

    #[test]
    fn test_missing_file_prints_single_error_line() {
        let temp = TempDir::new().unwrap();
        let output = run(&temp.path().join("missing.json"), false);

        assert_eq!(output.lines().count(), 1);
        assert!(output.starts_with("Error reading or parsing file: "));
        assert!(!output.contains("Issue Type"));
    }

    #[test]
    fn test_malformed_json_prints_single_error_line() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("broken.json");
        fs::write(&input, "[{\"name\": ").unwrap();

        let output = run(&input, false);

        assert_eq!(output.lines().count(), 1);
        assert!(output.contains("Error"));
    }

    #[test]
    fn test_non_array_prints_single_error_line() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("object.json");
        fs::write(&input, r#"{"name":"a"}"#).unwrap();

        let output = run(&input, true);

        assert_eq!(output.lines().count(), 1);
        assert!(output.contains("expected a top-level JSON array"));
    }

    #[test]
    fn test_json_output_parses() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("issues.json");
        fs::write(&input, r#"[{"name":"a","detail":"x"}]"#).unwrap();

        let output = run(&input, true);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["total"], 1);
        assert_eq!(value["groups"][0]["highlight"]["detail"], "x");
    }
}
