pub mod csv;
pub mod html;

use crate::error::{Result, TrailError};
use crate::model::CanonicalEvent;
use clap::ValueEnum;
use std::path::Path;

/// Fixed column order shared by both output formats.
pub const COLUMNS: [&str; 9] = [
    "source",
    "action_type",
    "user_name",
    "user_email",
    "timestamp",
    "ref",
    "commit_sha",
    "message",
    "url",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Html,
    Csv,
}

/// An explicit `--format` wins; otherwise the output path's extension decides.
pub fn resolve_format(flag: Option<OutputFormat>, output: &Path) -> Result<OutputFormat> {
    if let Some(format) = flag {
        return Ok(format);
    }

    let extension = output
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("html") | Some("htm") => Ok(OutputFormat::Html),
        Some("csv") => Ok(OutputFormat::Csv),
        _ => Err(TrailError::Config(format!(
            "cannot infer an output format from '{}'; pass --format html|csv",
            output.display()
        ))),
    }
}

pub fn write_report(events: &[CanonicalEvent], format: OutputFormat, path: &Path) -> Result<()> {
    match format {
        OutputFormat::Html => html::write_html(events, path),
        OutputFormat::Csv => csv::write_csv(events, path),
    }
}
