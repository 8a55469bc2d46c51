use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use std::fmt::Write;

use crate::batch::{BatchResult, Counts};
use crate::config::RewriteConfig;

/// Machine-readable summary of a run
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub generated_at: String,
    pub generator: String,
    pub find: &'a str,
    pub replace: &'a str,
    pub recursive: bool,
    pub archive: bool,
    pub counts: Counts,
    pub result: &'a BatchResult,
}

impl<'a> Report<'a> {
    pub fn new(config: &'a RewriteConfig, result: &'a BatchResult) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339(),
            generator: format!("qfar v{}", env!("CARGO_PKG_VERSION")),
            find: config.request.find(),
            replace: config.request.replace(),
            recursive: config.recursive,
            archive: config.archive,
            counts: result.counts(),
            result,
        }
    }
}

/// Pretty-printed JSON report
pub fn render_json(config: &RewriteConfig, result: &BatchResult) -> Result<String> {
    serde_json::to_string_pretty(&Report::new(config, result)).context("Failed to serialize report")
}

/// Human-readable summary, one section per classification
pub fn render_text(result: &BatchResult) -> String {
    let mut sections: Vec<(String, Vec<String>)> = Vec::new();

    if !result.unchanged.is_empty() {
        sections.push((
            format!("{} file(s) did not require changes:", result.unchanged.len()),
            result
                .unchanged
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
        ));
    }

    if !result.skipped.is_empty() {
        sections.push((
            format!(
                "Skipped {} file(s) that did not have adequate write permissions:",
                result.skipped.len()
            ),
            result
                .skipped
                .iter()
                .map(|s| format!("{} ({})", s.path.display(), s.reason))
                .collect(),
        ));
    }

    if !result.failed.is_empty() {
        sections.push((
            format!("{} file(s) could not be processed:", result.failed.len()),
            result
                .failed
                .iter()
                .map(|f| format!("{}: {}", f.path.display(), f.error))
                .collect(),
        ));
    }

    if !result.updated.is_empty() {
        sections.push((
            format!("{} file(s) were modified:", result.updated.len()),
            result
                .updated
                .iter()
                .map(|u| {
                    let mut line = format!("{} ({} replacement(s))", u.path.display(), u.replacements);
                    if let Some(archive) = &u.archive {
                        let _ = write!(line, ", original kept as {}", archive.display());
                    }
                    for warning in &u.warnings {
                        let _ = write!(line, "; warning: {}", warning);
                    }
                    line
                })
                .collect(),
        ));
    }

    let width = sections
        .iter()
        .flat_map(|(title, lines)| std::iter::once(title).chain(lines))
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);
    let rule = "_".repeat(width);

    let mut out = String::new();
    let _ = writeln!(out, "Process complete!");
    let _ = writeln!(
        out,
        "{} file(s) updated out of {} QGIS project file(s) found!",
        result.updated.len(),
        result.found()
    );

    for (title, lines) in &sections {
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "{}", title);
        for line in lines {
            let _ = writeln!(out, "{}", line);
        }
    }
    if !sections.is_empty() {
        let _ = writeln!(out, "{}", rule);
    }

    out
}
