use anyhow::{Context, Result};
use console::style;
use std::path::Path;

use crate::cli::OutputFormat;
use crate::pipeline::SummaryResult;

/// Render a result as labelled lines
pub fn format_as_text(result: &SummaryResult, styled: bool) -> String {
    let label = |name: &str| {
        if styled {
            style(name).bold().to_string()
        } else {
            name.to_string()
        }
    };

    format!(
        "{} {}\n{} {}\n{} {}\n{} {}",
        label("Title:"),
        result.title,
        label("Video ID:"),
        result.video_id,
        label("Original Thumb:"),
        result.thumbnail_url.as_deref().unwrap_or("none"),
        label("Summary:"),
        result.summary,
    )
}

pub fn format_as_json(result: &SummaryResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("Failed to serialize summary")
}

/// Save summary result to file
pub async fn save_to_file(result: &SummaryResult, path: &Path, format: &OutputFormat) -> Result<()> {
    let content = match format {
        OutputFormat::Text => format_as_text(result, false),
        OutputFormat::Json => format_as_json(result)?,
    };

    fs_err::write(path, content)?;
    Ok(())
}

/// Print summary result to console
pub fn print_to_console(result: &SummaryResult, format: &OutputFormat) -> Result<()> {
    let content = match format {
        OutputFormat::Text => format_as_text(result, true),
        OutputFormat::Json => format_as_json(result)?,
    };

    println!("{}", content);
    Ok(())
}
