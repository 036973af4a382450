//! Batch report output.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::core::types::BatchReport;

/// Render a report as pretty-printed JSON with a trailing newline.
pub fn render_report(report: &BatchReport) -> Result<String> {
    let mut payload = serde_json::to_string_pretty(report).context("serialize report")?;
    payload.push('\n');
    Ok(payload)
}

/// Write the report to `path`, or to stdout when `path` is `None`.
pub fn write_report(path: Option<&Path>, report: &BatchReport) -> Result<()> {
    let payload = render_report(report)?;
    match path {
        Some(path) => {
            fs::write(path, payload).with_context(|| format!("write report {}", path.display()))
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(payload.as_bytes())
                .context("write report to stdout")
        }
    }
}
